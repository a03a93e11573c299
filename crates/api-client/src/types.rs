//! Wire types specific to the REST client.
//!
//! Sync payloads live in `fintrack_core::sync`; this module holds the shapes
//! only the HTTP layer sees, plus the read-only reporting rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error body the service attaches to rejected requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// One row of GET /api/reports/category-spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpendingReport {
    pub category_name: String,
    pub total_amount: Decimal,
}

/// One row of GET /api/reports/budget-adherence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAdherenceReport {
    pub category_name: String,
    pub amount_limit: Decimal,
    pub total_spent: Decimal,
    pub remaining_amount: Decimal,
}

/// One row of GET /api/reports/monthly-spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySpendingReport {
    pub year: i32,
    pub month: i32,
    pub total_amount: Decimal,
}

/// One row of GET /api/reports/savings-forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsForecastReport {
    pub contribution_date: NaiveDate,
    pub cumulative_amount: Decimal,
}
