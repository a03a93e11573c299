//! Database models for savings goals and their contributions.

use diesel::prelude::*;

#[derive(Queryable, Identifiable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavingsGoalDB {
    pub id: i64,
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub target_date: Option<String>,
    pub user_id: i64,
    pub synced: bool,
    pub server_id: Option<i64>,
    pub local_id: i64,
}

/// Insert payload. The row id comes from the database; `local_id` starts at
/// the 0 sentinel and is mirrored inside the same transaction.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
pub struct NewSavingsGoalDB {
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub target_date: Option<String>,
    pub user_id: i64,
    pub synced: bool,
    pub local_id: i64,
}

#[derive(Queryable, Identifiable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContributionDB {
    pub id: i64,
    pub goal_id: i64,
    pub amount: String,
    pub created_at: String,
    pub synced: bool,
    pub server_id: Option<i64>,
    pub local_id: i64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::contributions)]
pub struct NewContributionDB {
    pub goal_id: i64,
    pub amount: String,
    pub created_at: String,
    pub synced: bool,
    pub local_id: i64,
}
