use serde::{Deserialize, Serialize};

/// An expense category as stored on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub synced: bool,
    /// Assigned by the service on first successful sync.
    pub server_id: Option<i64>,
    /// Copy of `id` echoed in sync payloads. 0 only on legacy rows until
    /// backfill repairs them.
    pub local_id: i64,
}

/// Payload for creating a category locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
}
