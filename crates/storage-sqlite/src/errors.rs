use thiserror::Error;

use fintrack_core::errors::DatabaseError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures raised inside the SQLite layer. Repositories fold these into
/// the domain-level [`fintrack_core::Error`] before returning.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Malformed row: {0}")]
    Decode(String),

    #[error("Database initialization failed: {0}")]
    Init(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl From<StorageError> for fintrack_core::Error {
    fn from(error: StorageError) -> Self {
        let database = match error {
            StorageError::Query(source) => DatabaseError::QueryFailed(source.to_string()),
            StorageError::Pool(source) => DatabaseError::Pool(source.to_string()),
            StorageError::Decode(message) => DatabaseError::QueryFailed(message),
            StorageError::Init(message) => DatabaseError::Init(message),
            StorageError::Migration(message) => DatabaseError::Migration(message),
        };
        fintrack_core::Error::Database(database)
    }
}
