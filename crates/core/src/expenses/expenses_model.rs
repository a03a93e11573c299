use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single expense, referencing its category by local id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    /// Local id of the category; the server id is resolved at sync time.
    pub category_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub synced: bool,
    pub server_id: Option<i64>,
    /// Copy of `id` echoed in sync payloads. 0 only on legacy rows until
    /// backfill repairs them.
    pub local_expense_id: i64,
}

/// Payload for recording an expense locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub occurred_at: DateTime<Utc>,
}
