//! Expense repository backed by SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;

use fintrack_core::expenses::{Expense, ExpenseRepositoryTrait, NewExpense};
use fintrack_core::utils::time_utils::format_api_timestamp;
use fintrack_core::{Result, DEFAULT_USER_ID};

use crate::db::{decode_amount, decode_timestamp, get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::expenses;

use super::model::{ExpenseDB, NewExpenseDB};

fn to_expense(row: ExpenseDB) -> Result<Expense> {
    Ok(Expense {
        id: row.id,
        description: row.description,
        amount: decode_amount(&row.amount)?,
        category_id: row.category_id,
        occurred_at: decode_timestamp(&row.occurred_at)?,
        user_id: row.user_id,
        synced: row.synced,
        server_id: row.server_id,
        local_expense_id: row.local_expense_id,
    })
}

pub struct ExpenseRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ExpenseRepository { pool, writer }
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    async fn insert(&self, new_expense: NewExpense) -> Result<Expense> {
        let payload = NewExpenseDB {
            description: new_expense.description,
            amount: new_expense.amount.to_string(),
            category_id: new_expense.category_id,
            occurred_at: format_api_timestamp(new_expense.occurred_at),
            user_id: DEFAULT_USER_ID,
            synced: false,
            local_expense_id: 0,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let inserted: ExpenseDB = diesel::insert_into(expenses::table)
                    .values(&payload)
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                // Mirror id lands in the same transaction; no caller ever
                // sees the 0 sentinel on a fresh row.
                let mirrored: ExpenseDB = diesel::update(expenses::table.find(inserted.id))
                    .set(expenses::local_expense_id.eq(inserted.id))
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                to_expense(mirrored)
            })
            .await
    }

    fn list_all(&self) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .order(expenses::occurred_at.desc())
            .then_order_by(expenses::id.desc())
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_expense).collect()
    }

    fn list_unsynced(&self) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::synced.eq(false))
            .order(expenses::id.asc())
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_expense).collect()
    }

    fn find_by_id(&self, expense_id: i64) -> Result<Option<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let row = expenses::table
            .find(expense_id)
            .select(ExpenseDB::as_select())
            .first::<ExpenseDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_expense).transpose()
    }

    async fn delete(&self, expense_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = diesel::delete(expenses::table.find(expense_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }

    async fn mark_synced(&self, expense_id: i64, server_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(expenses::table.find(expense_id))
                    .set((
                        expenses::synced.eq(true),
                        expenses::server_id.eq(Some(server_id)),
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
                let repaired =
                    diesel::update(expenses::table.filter(expenses::local_expense_id.eq(0)))
                        .set(expenses::local_expense_id.eq(expenses::id))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                Ok(repaired)
            })
            .await
    }
}
