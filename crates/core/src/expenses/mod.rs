//! Expenses and their category references.

mod expenses_model;
mod expenses_service;
mod expenses_traits;

pub use expenses_model::*;
pub use expenses_service::*;
pub use expenses_traits::*;
