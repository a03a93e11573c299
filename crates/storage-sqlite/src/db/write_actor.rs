//! Single-writer actor for the SQLite database.
//!
//! SQLite allows exactly one writer at a time. All mutations are funneled
//! through one dedicated OS thread that owns write access; callers hand it
//! a closure and await the result over a oneshot channel. Each job runs
//! inside an `IMMEDIATE` transaction, so a closure that does several
//! statements commits or rolls back as a unit.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use log::error;
use tokio::sync::{mpsc, oneshot};

use fintrack_core::errors::DatabaseError;
use fintrack_core::{Error, Result};

use crate::errors::StorageError;

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send>;

/// Transaction error shim. `immediate_transaction` needs an error type that
/// absorbs diesel's own BEGIN/COMMIT failures alongside the job's domain
/// errors; this enum carries both until the write actor flattens them.
enum TxError {
    Domain(Error),
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        TxError::Db(error)
    }
}

/// Cloneable handle used by repositories to submit write jobs.
#[derive(Clone)]
pub struct WriteHandle {
    sender: mpsc::UnboundedSender<WriteJob>,
}

impl WriteHandle {
    /// Runs `job` on the writer thread inside a transaction and returns its
    /// result. The job must not block on async work.
    pub async fn exec<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel::<Result<T>>();

        let wrapped: WriteJob = Box::new(move |conn: &mut SqliteConnection| {
            let outcome = conn
                .immediate_transaction::<_, TxError, _>(|tx_conn| {
                    job(tx_conn).map_err(TxError::Domain)
                })
                .map_err(|error| match error {
                    TxError::Domain(domain) => domain,
                    TxError::Db(db) => StorageError::from(db).into(),
                });
            let _ = reply_tx.send(outcome);
        });

        self.sender.send(wrapped).map_err(|_| {
            Error::Database(DatabaseError::QueryFailed("Write actor is gone".to_string()))
        })?;

        reply_rx.await.map_err(|_| {
            Error::Database(DatabaseError::QueryFailed(
                "Write actor dropped the job".to_string(),
            ))
        })?
    }
}

/// Spawns the writer thread and returns a handle to it. The thread exits
/// once every handle is dropped.
pub fn spawn_writer(pool: Pool<ConnectionManager<SqliteConnection>>) -> WriteHandle {
    let (sender, mut receiver) = mpsc::unbounded_channel::<WriteJob>();

    std::thread::Builder::new()
        .name("sqlite-writer".to_string())
        .spawn(move || {
            while let Some(job) = receiver.blocking_recv() {
                match pool.get() {
                    Ok(mut conn) => job(&mut conn),
                    Err(err) => {
                        // Dropping the job closes its reply channel, so the
                        // caller still gets an error.
                        error!("Write actor could not check out a connection: {err}");
                    }
                }
            }
        })
        .expect("Failed to spawn sqlite writer thread");

    WriteHandle { sender }
}
