use thiserror::Error;

use crate::sync::GatewayError;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type shared across the engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Sync gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sync already in progress")]
    SyncInProgress,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// True when the failure is connectivity-flavored and worth retrying
    /// on a later pass.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Gateway(gateway) if gateway.is_transport())
    }
}

/// Database-level failures surfaced through the repository traits.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database initialization failed: {0}")]
    Init(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}
