//! Category repository backed by SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;

use fintrack_core::categories::{Category, CategoryRepositoryTrait, NewCategory};
use fintrack_core::Result;

use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::categories;

use super::model::{CategoryDB, NewCategoryDB};

pub struct CategoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CategoryRepository { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn insert(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let inserted: CategoryDB = diesel::insert_into(categories::table)
                    .values(&NewCategoryDB {
                        name: new_category.name,
                        synced: false,
                        local_id: 0,
                    })
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                // Mirror id lands in the same transaction; no caller ever
                // sees the 0 sentinel on a fresh row.
                let mirrored: CategoryDB = diesel::update(categories::table.find(inserted.id))
                    .set(categories::local_id.eq(inserted.id))
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                Ok(mirrored.into())
            })
            .await
    }

    fn list_all(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .order(categories::name.asc())
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn list_unsynced(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .filter(categories::synced.eq(false))
            .order(categories::id.asc())
            .select(CategoryDB::as_select())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn find_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let row = categories::table
            .find(category_id)
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Category::from))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let row = categories::table
            .filter(categories::name.eq(name))
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Category::from))
    }

    async fn mark_synced(&self, category_id: i64, server_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(categories::table.find(category_id))
                    .set((
                        categories::synced.eq(true),
                        categories::server_id.eq(Some(server_id)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
