//! Savings goal and contribution repositories backed by SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use fintrack_core::goals::{
    Contribution, ContributionRepositoryTrait, GoalRepositoryTrait, NewContribution,
    NewSavingsGoal, SavingsGoal,
};
use fintrack_core::utils::time_utils::{format_api_date, format_api_timestamp};
use fintrack_core::{Result, DEFAULT_USER_ID};

use crate::db::{decode_amount, decode_date, decode_timestamp, get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{contributions, savings_goals};

use super::model::{ContributionDB, NewContributionDB, NewSavingsGoalDB, SavingsGoalDB};

fn to_savings_goal(row: SavingsGoalDB) -> Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: row.id,
        name: row.name,
        target_amount: decode_amount(&row.target_amount)?,
        current_amount: decode_amount(&row.current_amount)?,
        target_date: row.target_date.as_deref().map(decode_date).transpose()?,
        user_id: row.user_id,
        synced: row.synced,
        server_id: row.server_id,
        local_id: row.local_id,
    })
}

fn to_contribution(row: ContributionDB) -> Result<Contribution> {
    Ok(Contribution {
        id: row.id,
        goal_id: row.goal_id,
        amount: decode_amount(&row.amount)?,
        created_at: decode_timestamp(&row.created_at)?,
        synced: row.synced,
        server_id: row.server_id,
        local_id: row.local_id,
    })
}

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    async fn insert(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let payload = NewSavingsGoalDB {
            name: new_goal.name,
            target_amount: new_goal.target_amount.to_string(),
            current_amount: Decimal::ZERO.to_string(),
            target_date: new_goal.target_date.map(format_api_date),
            user_id: DEFAULT_USER_ID,
            synced: false,
            local_id: 0,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let inserted: SavingsGoalDB = diesel::insert_into(savings_goals::table)
                    .values(&payload)
                    .returning(SavingsGoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                // Mirror id lands in the same transaction; no caller ever
                // sees the 0 sentinel on a fresh row.
                let mirrored: SavingsGoalDB =
                    diesel::update(savings_goals::table.find(inserted.id))
                        .set(savings_goals::local_id.eq(inserted.id))
                        .returning(SavingsGoalDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;

                to_savings_goal(mirrored)
            })
            .await
    }

    fn list_all(&self) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = savings_goals::table
            .order(savings_goals::id.desc())
            .select(SavingsGoalDB::as_select())
            .load::<SavingsGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_savings_goal).collect()
    }

    fn list_unsynced(&self) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = savings_goals::table
            .filter(savings_goals::synced.eq(false))
            .order(savings_goals::id.asc())
            .select(SavingsGoalDB::as_select())
            .load::<SavingsGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_savings_goal).collect()
    }

    fn find_by_id(&self, goal_id: i64) -> Result<Option<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let row = savings_goals::table
            .find(goal_id)
            .select(SavingsGoalDB::as_select())
            .first::<SavingsGoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_savings_goal).transpose()
    }

    async fn delete(&self, goal_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = diesel::delete(savings_goals::table.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }

    async fn mark_synced(&self, goal_id: i64, server_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(savings_goals::table.find(goal_id))
                    .set((
                        savings_goals::synced.eq(true),
                        savings_goals::server_id.eq(Some(server_id)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn set_current_amount(&self, goal_id: i64, amount: Decimal) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(savings_goals::table.find(goal_id))
                    .set(savings_goals::current_amount.eq(amount.to_string()))
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
                    diesel::update(savings_goals::table.filter(savings_goals::local_id.eq(0)))
                        .set(savings_goals::local_id.eq(savings_goals::id))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                Ok(repaired)
            })
            .await
    }
}

pub struct ContributionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ContributionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ContributionRepository { pool, writer }
    }
}

#[async_trait]
impl ContributionRepositoryTrait for ContributionRepository {
    async fn insert(&self, new_contribution: NewContribution) -> Result<Contribution> {
        let payload = NewContributionDB {
            goal_id: new_contribution.goal_id,
            amount: new_contribution.amount.to_string(),
            created_at: format_api_timestamp(new_contribution.created_at),
            synced: false,
            local_id: 0,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Contribution> {
                let inserted: ContributionDB = diesel::insert_into(contributions::table)
                    .values(&payload)
                    .returning(ContributionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                // Mirror id lands in the same transaction; no caller ever
                // sees the 0 sentinel on a fresh row.
                let mirrored: ContributionDB =
                    diesel::update(contributions::table.find(inserted.id))
                        .set(contributions::local_id.eq(inserted.id))
                        .returning(ContributionDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;

                to_contribution(mirrored)
            })
            .await
    }

    fn list_for_goal(&self, goal_id: i64) -> Result<Vec<Contribution>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = contributions::table
            .filter(contributions::goal_id.eq(goal_id))
            .order(contributions::created_at.desc())
            .then_order_by(contributions::id.desc())
            .select(ContributionDB::as_select())
            .load::<ContributionDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_contribution).collect()
    }

    fn list_unsynced(&self) -> Result<Vec<Contribution>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = contributions::table
            .filter(contributions::synced.eq(false))
            .order(contributions::id.asc())
            .select(ContributionDB::as_select())
            .load::<ContributionDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_contribution).collect()
    }

    async fn delete_for_goal(&self, goal_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed =
                    diesel::delete(contributions::table.filter(contributions::goal_id.eq(goal_id)))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                Ok(removed)
            })
            .await
    }

    async fn mark_synced(&self, contribution_id: i64) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(contributions::table.find(contribution_id))
                    .set(contributions::synced.eq(true))
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
                    diesel::update(contributions::table.filter(contributions::local_id.eq(0)))
                        .set(contributions::local_id.eq(contributions::id))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                Ok(repaired)
            })
            .await
    }
}
