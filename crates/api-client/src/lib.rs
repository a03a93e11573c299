//! REST client for the finance service.
//!
//! [`SyncApiClient`] implements `SyncGatewayTrait` from fintrack-core, so the
//! sync engine can be handed a live HTTP gateway. The read-only report
//! endpoints are exposed alongside it.

pub mod client;
pub mod error;
pub mod types;

pub use client::SyncApiClient;
pub use error::{ApiError, Result};
pub use types::{
    BudgetAdherenceReport, CategorySpendingReport, MonthlySpendingReport, SavingsForecastReport,
};
