//! SQLite persistence for savings goals and their contributions.

mod model;
mod repository;

pub use model::{ContributionDB, NewContributionDB, NewSavingsGoalDB, SavingsGoalDB};
pub use repository::{ContributionRepository, GoalRepository};
