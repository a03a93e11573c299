//! SQLite persistence for the offline finance store.
//!
//! Repositories here implement the `*RepositoryTrait` contracts from
//! fintrack-core. Reads go straight to the connection pool; every write is
//! funneled through the single-writer actor in [`db::write_actor`].

pub mod budgets;
pub mod categories;
pub mod db;
pub mod errors;
pub mod expenses;
pub mod goals;
pub mod schema;
