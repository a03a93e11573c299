use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A spending limit for one category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    /// Local id of the category; the server id is resolved at sync time.
    pub category_id: i64,
    pub amount_limit: Decimal,
    /// 1 through 12.
    pub month: i32,
    pub year: i32,
    pub user_id: i64,
    pub synced: bool,
    pub server_id: Option<i64>,
    /// Copy of `id` echoed in sync payloads. 0 only on legacy rows until
    /// backfill repairs them.
    pub local_id: i64,
}

/// Payload for setting a budget locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category_id: i64,
    pub amount_limit: Decimal,
    pub month: i32,
    pub year: i32,
}
