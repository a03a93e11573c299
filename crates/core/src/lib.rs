pub mod budgets;
pub mod categories;
pub mod errors;
pub mod events;
pub mod expenses;
pub mod goals;
pub mod sync;
pub mod utils;

pub use errors::{Error, Result};

/// Tenant id stamped on every record this device pushes. The service is
/// multi-tenant shaped; this client is single-user.
pub const DEFAULT_USER_ID: i64 = 1;
