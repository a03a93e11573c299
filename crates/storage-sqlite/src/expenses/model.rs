//! Database model for expense rows.
//!
//! Amounts are canonical decimal TEXT and `occurred_at` is canonical
//! timestamp TEXT, so the raw column sorts chronologically.

use diesel::prelude::*;

#[derive(Queryable, Identifiable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: i64,
    pub description: String,
    pub amount: String,
    pub category_id: i64,
    pub occurred_at: String,
    pub user_id: i64,
    pub synced: bool,
    pub server_id: Option<i64>,
    pub local_expense_id: i64,
}

/// Insert payload. The row id comes from the database; `local_expense_id`
/// starts at the 0 sentinel and is mirrored inside the same transaction.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
pub struct NewExpenseDB {
    pub description: String,
    pub amount: String,
    pub category_id: i64,
    pub occurred_at: String,
    pub user_id: i64,
    pub synced: bool,
    pub local_expense_id: i64,
}
