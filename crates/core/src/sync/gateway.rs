//! Remote API surface the sync engine talks to.
//!
//! The trait keeps the engine independent of any HTTP stack; the api-client
//! crate provides the reqwest-backed implementation. Payload field names
//! follow the service's camelCase JSON.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Failure of one gateway call, split along the line the pass cares about:
/// a rejection is scoped to the record, anything transport-shaped aborts
/// the remaining phases.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service answered and refused this record.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No usable answer: connectivity, timeout, or an undecodable body.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, GatewayError::Api { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }

    /// HTTP status for rejections, None for transport failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            GatewayError::Transport(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySyncRequest {
    pub local_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySyncResponse {
    pub id: i64,
    pub local_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreateRequest {
    pub description: String,
    pub amount: Decimal,
    /// Server id of the category, resolved through the reconciler.
    pub category_id: i64,
    pub user_id: i64,
    /// Preformatted UTC timestamp, millisecond precision with trailing Z.
    pub expense_date: String,
    pub local_expense_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreateResponse {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub user_id: i64,
    pub expense_date: String,
    pub local_expense_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSyncRequest {
    pub local_id: i64,
    /// Server id of the category, resolved through the reconciler.
    pub category_id: i64,
    pub amount_limit: Decimal,
    pub month: i32,
    pub year: i32,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSyncResponse {
    pub id: i64,
    pub local_id: i64,
    pub category_id: i64,
    pub amount_limit: Decimal,
    pub month: i32,
    pub year: i32,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCreateRequest {
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub user_id: i64,
}

/// A savings goal as the service sees it. `current_amount` here is the
/// authoritative running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalServerRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRequest {
    /// Fixed two-decimal string ("200.00"); the service parses it exactly.
    pub amount: String,
}

/// Result of a remote goal delete. 404 means the goal was already gone,
/// which the delete coordinator treats the same as a confirmed delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDeleteStatus {
    Deleted,
    AlreadyAbsent,
}

#[async_trait]
pub trait SyncGatewayTrait: Send + Sync {
    async fn sync_category(
        &self,
        request: CategorySyncRequest,
    ) -> GatewayResult<CategorySyncResponse>;

    async fn create_expense(
        &self,
        request: ExpenseCreateRequest,
    ) -> GatewayResult<ExpenseCreateResponse>;

    async fn sync_budget(&self, request: BudgetSyncRequest) -> GatewayResult<BudgetSyncResponse>;

    async fn create_savings_goal(
        &self,
        request: GoalCreateRequest,
    ) -> GatewayResult<GoalServerRecord>;

    /// Posts to the goal's *server* id; the response carries the goal with
    /// its recomputed current amount.
    async fn add_contribution(
        &self,
        server_goal_id: i64,
        request: ContributionRequest,
    ) -> GatewayResult<GoalServerRecord>;

    async fn delete_savings_goal(&self, server_goal_id: i64)
        -> GatewayResult<RemoteDeleteStatus>;

    /// Reconciliation/reporting view; the push pass does not need it.
    async fn list_savings_goals(&self) -> GatewayResult<Vec<GoalServerRecord>>;
}
