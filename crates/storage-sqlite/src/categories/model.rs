//! Database model for category rows.

use diesel::prelude::*;

use fintrack_core::categories::Category;

#[derive(Queryable, Identifiable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: i64,
    pub name: String,
    pub synced: bool,
    pub server_id: Option<i64>,
    pub local_id: i64,
}

impl From<CategoryDB> for Category {
    fn from(row: CategoryDB) -> Self {
        Category {
            id: row.id,
            name: row.name,
            synced: row.synced,
            server_id: row.server_id,
            local_id: row.local_id,
        }
    }
}

/// Insert payload. The row id comes from the database; `local_id` starts at
/// the 0 sentinel and is mirrored inside the same transaction.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategoryDB {
    pub name: String,
    pub synced: bool,
    pub local_id: i64,
}
