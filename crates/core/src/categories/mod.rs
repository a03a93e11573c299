//! Expense categories.

mod categories_model;
mod categories_service;
mod categories_traits;

pub use categories_model::*;
pub use categories_service::*;
pub use categories_traits::*;
