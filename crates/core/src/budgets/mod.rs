//! Monthly per-category budgets.

mod budgets_model;
mod budgets_service;
mod budgets_traits;

pub use budgets_model::*;
pub use budgets_service::*;
pub use budgets_traits::*;
