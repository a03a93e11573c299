use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A savings goal. `current_amount` is advanced locally on contribution and
/// overwritten with the server's recomputed total whenever a contribution
/// syncs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub user_id: i64,
    pub synced: bool,
    pub server_id: Option<i64>,
    /// Copy of `id` echoed in sync payloads. 0 only on legacy rows until
    /// backfill repairs them.
    pub local_id: i64,
}

/// Payload for creating a savings goal locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
}

/// One payment toward a goal, referencing the goal by local id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: i64,
    pub goal_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub synced: bool,
    /// The service never assigns contributions an addressable identity;
    /// kept for shape symmetry with the other tables and always None.
    pub server_id: Option<i64>,
    /// Copy of `id` echoed nowhere today, same backfill rules as the rest.
    pub local_id: i64,
}

/// Payload for recording a contribution locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub goal_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}
