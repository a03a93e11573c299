use async_trait::async_trait;

use super::{Category, NewCategory};
use crate::errors::Result;

/// Persistence contract for categories.
///
/// `insert` returns the fully-formed row with both the assigned id and the
/// mirror `local_id` set; callers never patch a half-written record.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    async fn insert(&self, new_category: NewCategory) -> Result<Category>;

    /// All categories, A to Z by name.
    fn list_all(&self) -> Result<Vec<Category>>;

    fn list_unsynced(&self) -> Result<Vec<Category>>;

    fn find_by_id(&self, category_id: i64) -> Result<Option<Category>>;

    fn find_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Records the server-assigned id and flips the synced flag.
    async fn mark_synced(&self, category_id: i64, server_id: i64) -> Result<()>;
}
