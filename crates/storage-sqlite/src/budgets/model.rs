//! Database model for budget rows.

use diesel::prelude::*;

#[derive(Queryable, Identifiable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: i64,
    pub category_id: i64,
    pub amount_limit: String,
    pub month: i32,
    pub year: i32,
    pub user_id: i64,
    pub synced: bool,
    pub server_id: Option<i64>,
    pub local_id: i64,
}

/// Insert payload. The row id comes from the database; `local_id` starts at
/// the 0 sentinel and is mirrored inside the same transaction.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
pub struct NewBudgetDB {
    pub category_id: i64,
    pub amount_limit: String,
    pub month: i32,
    pub year: i32,
    pub user_id: i64,
    pub synced: bool,
    pub local_id: i64,
}
