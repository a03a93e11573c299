//! Budget repository backed by SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;

use fintrack_core::budgets::{Budget, BudgetRepositoryTrait, NewBudget};
use fintrack_core::{Result, DEFAULT_USER_ID};

use crate::db::{decode_amount, get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budgets;

use super::model::{BudgetDB, NewBudgetDB};

fn to_budget(row: BudgetDB) -> Result<Budget> {
    Ok(Budget {
        id: row.id,
        category_id: row.category_id,
        amount_limit: decode_amount(&row.amount_limit)?,
        month: row.month,
        year: row.year,
        user_id: row.user_id,
        synced: row.synced,
        server_id: row.server_id,
        local_id: row.local_id,
    })
}

pub struct BudgetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        BudgetRepository { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn insert(&self, new_budget: NewBudget) -> Result<Budget> {
        let payload = NewBudgetDB {
            category_id: new_budget.category_id,
            amount_limit: new_budget.amount_limit.to_string(),
            month: new_budget.month,
            year: new_budget.year,
            user_id: DEFAULT_USER_ID,
            synced: false,
            local_id: 0,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let inserted: BudgetDB = diesel::insert_into(budgets::table)
                    .values(&payload)
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                // Mirror id lands in the same transaction; no caller ever
                // sees the 0 sentinel on a fresh row.
                let mirrored: BudgetDB = diesel::update(budgets::table.find(inserted.id))
                    .set(budgets::local_id.eq(inserted.id))
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                to_budget(mirrored)
            })
            .await
    }

    fn list_all(&self) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .order(budgets::year.desc())
            .then_order_by(budgets::month.desc())
            .then_order_by(budgets::id.asc())
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_budget).collect()
    }

    fn list_for_month(&self, month: i32, year: i32) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::month.eq(month))
            .filter(budgets::year.eq(year))
            .order(budgets::id.asc())
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_budget).collect()
    }

    fn find_existing(&self, category_id: i64, month: i32, year: i32) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let row = budgets::table
            .filter(budgets::category_id.eq(category_id))
            .filter(budgets::month.eq(month))
            .filter(budgets::year.eq(year))
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_budget).transpose()
    }

    fn list_unsynced(&self) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::synced.eq(false))
            .order(budgets::id.asc())
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_budget).collect()
    }

    async fn delete(&self, budget_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = diesel::delete(budgets::table.find(budget_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }

    async fn mark_synced(&self, budget_id: i64, server_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(budgets::table.find(budget_id))
                    .set((
                        budgets::synced.eq(true),
                        budgets::server_id.eq(Some(server_id)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn backfill_local_ids(&self) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let repaired = diesel::update(budgets::table.filter(budgets::local_id.eq(0)))
                    .set(budgets::local_id.eq(budgets::id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(repaired)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use fintrack_core::categories::{CategoryRepositoryTrait, NewCategory};

    use crate::categories::CategoryRepository;
    use crate::db::{create_pool, init, run_migrations, write_actor::spawn_writer};

    fn setup_db() -> (
        Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        WriteHandle,
    ) {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        let pool = create_pool(&db_path).expect("create pool");
        let writer = spawn_writer(pool.as_ref().clone());
        (pool, writer)
    }

    #[tokio::test]
    async fn find_existing_matches_on_category_and_period() {
        let (pool, writer) = setup_db();
        let categories = CategoryRepository::new(pool.clone(), writer.clone());
        let groceries = categories
            .insert(NewCategory {
                name: "Groceries".to_string(),
            })
            .await
            .expect("insert category");

        let repo = BudgetRepository::new(pool, writer);
        let budget = repo
            .insert(NewBudget {
                category_id: groceries.id,
                amount_limit: dec!(300),
                month: 3,
                year: 2025,
            })
            .await
            .expect("insert budget");
        assert_eq!(budget.local_id, budget.id);

        let found = repo
            .find_existing(groceries.id, 3, 2025)
            .expect("find existing");
        assert_eq!(found.map(|b| b.id), Some(budget.id));

        // Same category, different period.
        assert!(repo
            .find_existing(groceries.id, 4, 2025)
            .expect("find existing")
            .is_none());
    }
}
