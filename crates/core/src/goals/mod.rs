//! Savings goals and their contributions.

mod goals_model;
mod goals_service;
mod goals_traits;

pub use goals_model::*;
pub use goals_service::*;
pub use goals_traits::*;
