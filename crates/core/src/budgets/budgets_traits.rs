use async_trait::async_trait;

use super::{Budget, NewBudget};
use crate::errors::Result;

/// Persistence contract for budgets.
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    async fn insert(&self, new_budget: NewBudget) -> Result<Budget>;

    fn list_all(&self) -> Result<Vec<Budget>>;

    fn list_for_month(&self, month: i32, year: i32) -> Result<Vec<Budget>>;

    /// The budget already covering (category, month, year), if any.
    fn find_existing(&self, category_id: i64, month: i32, year: i32) -> Result<Option<Budget>>;

    fn list_unsynced(&self) -> Result<Vec<Budget>>;

    async fn delete(&self, budget_id: i64) -> Result<usize>;

    /// Records the server-assigned id and flips the synced flag.
    async fn mark_synced(&self, budget_id: i64, server_id: i64) -> Result<()>;

    /// Repairs legacy rows whose mirror id is still the 0 sentinel.
    /// Returns the number of rows touched.
    async fn backfill_local_ids(&self) -> Result<usize>;
}
