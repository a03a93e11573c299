//! Local-id to server-id resolution for cross-entity references.

use std::collections::HashMap;

use crate::categories::Category;
use crate::goals::SavingsGoal;

/// The local-id → server-id relation for one parent entity type, built from
/// a snapshot taken at the start of each dependent phase. Children whose
/// parent does not resolve are gated: skipped this pass, retried on the
/// next one once the parent has synced.
#[derive(Debug, Default)]
pub struct IdReconciler {
    mapping: HashMap<i64, i64>,
}

impl IdReconciler {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, Option<i64>)>) -> Self {
        let mapping = pairs
            .into_iter()
            .filter_map(|(local_id, server_id)| server_id.map(|server_id| (local_id, server_id)))
            .collect();
        Self { mapping }
    }

    pub fn from_categories(categories: &[Category]) -> Self {
        Self::from_pairs(
            categories
                .iter()
                .map(|category| (category.id, category.server_id)),
        )
    }

    pub fn from_goals(goals: &[SavingsGoal]) -> Self {
        Self::from_pairs(goals.iter().map(|goal| (goal.id, goal.server_id)))
    }

    /// Some(server_id) when the parent has synced; None gates the child.
    pub fn resolve(&self, local_id: i64) -> Option<i64> {
        self.mapping.get(&local_id).copied()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
