use async_trait::async_trait;

use super::{Expense, NewExpense};
use crate::errors::Result;

/// Persistence contract for expenses.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    async fn insert(&self, new_expense: NewExpense) -> Result<Expense>;

    /// All expenses, newest first.
    fn list_all(&self) -> Result<Vec<Expense>>;

    fn list_unsynced(&self) -> Result<Vec<Expense>>;

    fn find_by_id(&self, expense_id: i64) -> Result<Option<Expense>>;

    async fn delete(&self, expense_id: i64) -> Result<usize>;

    /// Records the server-assigned id and flips the synced flag.
    async fn mark_synced(&self, expense_id: i64, server_id: i64) -> Result<()>;

    /// Repairs legacy rows whose mirror id is still the 0 sentinel.
    /// Returns the number of rows touched.
    async fn backfill_local_ids(&self) -> Result<usize>;
}
