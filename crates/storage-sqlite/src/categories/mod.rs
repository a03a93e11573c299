//! SQLite persistence for expense categories.

mod model;
mod repository;

pub use model::{CategoryDB, NewCategoryDB};
pub use repository::CategoryRepository;
