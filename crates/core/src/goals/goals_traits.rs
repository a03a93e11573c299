use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{Contribution, NewContribution, NewSavingsGoal, SavingsGoal};
use crate::errors::Result;

/// Persistence contract for savings goals.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    async fn insert(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;

    /// All goals, newest first.
    fn list_all(&self) -> Result<Vec<SavingsGoal>>;

    fn list_unsynced(&self) -> Result<Vec<SavingsGoal>>;

    fn find_by_id(&self, goal_id: i64) -> Result<Option<SavingsGoal>>;

    async fn delete(&self, goal_id: i64) -> Result<usize>;

    /// Records the server-assigned id and flips the synced flag.
    async fn mark_synced(&self, goal_id: i64, server_id: i64) -> Result<()>;

    /// Authoritative overwrite of the running total.
    async fn set_current_amount(&self, goal_id: i64, amount: Decimal) -> Result<()>;

    /// Repairs legacy rows whose mirror id is still the 0 sentinel.
    /// Returns the number of rows touched.
    async fn backfill_local_ids(&self) -> Result<usize>;
}

/// Persistence contract for goal contributions.
#[async_trait]
pub trait ContributionRepositoryTrait: Send + Sync {
    async fn insert(&self, new_contribution: NewContribution) -> Result<Contribution>;

    /// Contributions of one goal, newest first.
    fn list_for_goal(&self, goal_id: i64) -> Result<Vec<Contribution>>;

    fn list_unsynced(&self) -> Result<Vec<Contribution>>;

    /// Cascade step of goal deletion. Returns the number of rows removed.
    async fn delete_for_goal(&self, goal_id: i64) -> Result<usize>;

    /// Flips the synced flag. The service echoes no contribution identity,
    /// so there is no server id to record.
    async fn mark_synced(&self, contribution_id: i64) -> Result<()>;

    /// Repairs legacy rows whose mirror id is still the 0 sentinel.
    /// Returns the number of rows touched.
    async fn backfill_local_ids(&self) -> Result<usize>;
}
