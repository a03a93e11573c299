//! Database bootstrap: file location, connection pool, pragmas, migrations.

pub mod write_actor;

pub use write_actor::{spawn_writer, WriteHandle};

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use rust_decimal::Decimal;

use fintrack_core::utils::time_utils::{parse_api_date, parse_api_timestamp};

use crate::errors::{Result, StorageError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DB_FILENAME: &str = "fintrack.db";

/// Ensures the application data directory exists and returns the path of
/// the database file inside it.
pub fn init(app_data_dir: &str) -> Result<String> {
    let dir = Path::new(app_data_dir);
    fs::create_dir_all(dir)
        .map_err(|e| StorageError::Init(format!("could not create {app_data_dir}: {e}")))?;
    Ok(dir.join(DB_FILENAME).to_string_lossy().to_string())
}

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA busy_timeout = 5000; \
             PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA foreign_keys = ON;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(db_path: &str) -> Result<Arc<Pool<ConnectionManager<SqliteConnection>>>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(8)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?;
    Ok(Arc::new(pool))
}

pub fn get_connection(
    pool: &Pool<ConnectionManager<SqliteConnection>>,
) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
    pool.get().map_err(StorageError::from)
}

pub fn run_migrations(db_path: &str) -> Result<()> {
    let mut conn = SqliteConnection::establish(db_path)
        .map_err(|e| StorageError::Init(format!("could not open {db_path}: {e}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    if !applied.is_empty() {
        info!("Applied {} pending database migration(s)", applied.len());
    }
    Ok(())
}

// Row codecs. Amounts, timestamps and dates are stored as canonical TEXT;
// the timestamp format is fixed-width, so lexicographic ORDER BY on the raw
// column is also chronological.

pub(crate) fn decode_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|_| StorageError::Decode(format!("not a decimal amount: {raw}")))
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    parse_api_timestamp(raw)
        .map_err(|_| StorageError::Decode(format!("not a canonical timestamp: {raw}")))
}

pub(crate) fn decode_date(raw: &str) -> Result<NaiveDate> {
    parse_api_date(raw).map_err(|_| StorageError::Decode(format!("not a canonical date: {raw}")))
}
