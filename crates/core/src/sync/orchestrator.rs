//! The five-phase push pass.
//!
//! Order is normative: categories, expenses, budgets, goals, contributions.
//! Children are pushed only after their parent's server id is known; a
//! record the service rejects stays unsynced and is retried next pass; a
//! transport failure aborts the remaining phases but keeps everything
//! already applied.

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::budgets::BudgetRepositoryTrait;
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, EntityKind};
use crate::expenses::ExpenseRepositoryTrait;
use crate::goals::{ContributionRepositoryTrait, GoalRepositoryTrait};
use crate::utils::money::two_decimal_string;
use crate::utils::time_utils::format_api_timestamp;

use super::gateway::{
    BudgetSyncRequest, CategorySyncRequest, ContributionRequest, ExpenseCreateRequest,
    GatewayError, GoalCreateRequest, SyncGatewayTrait,
};
use super::reconciler::IdReconciler;

/// Per-type counts of records pushed in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub categories: usize,
    pub expenses: usize,
    pub budgets: usize,
    pub goals: usize,
    pub contributions: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.categories + self.expenses + self.budgets + self.goals + self.contributions
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Outcome of one completed pass (transport failures surface as errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing was pushed and nothing is waiting: the store and the
    /// service already agree.
    UpToDate,
    /// The pass ran to the end. The summary may be all zeros when every
    /// candidate was gated or rejected; those records stay unsynced and
    /// are picked up by a later pass.
    Completed(SyncSummary),
}

/// Mutable progress of the pass currently running.
#[derive(Default)]
struct PassContext {
    summary: SyncSummary,
    /// Records observed unsynced but not pushed this pass (gated or
    /// rejected). Nonzero suppresses the UpToDate outcome.
    leftover: usize,
}

impl PassContext {
    /// Classifies a gateway failure: a rejection stays local to the record,
    /// anything transport-shaped aborts the pass.
    fn record_failure(&mut self, kind: EntityKind, id: i64, error: GatewayError) -> Result<()> {
        if error.is_rejection() {
            warn!("[sync] {} {} rejected by server: {}", kind.as_str(), id, error);
            self.leftover += 1;
            Ok(())
        } else {
            warn!(
                "[sync] transport failure while pushing {} {}, aborting pass: {}",
                kind.as_str(),
                id,
                error
            );
            Err(Error::Gateway(error))
        }
    }

    fn gated(&mut self, kind: EntityKind, id: i64, parent: &str) {
        info!(
            "[sync] {} {} gated: {} has no server id yet",
            kind.as_str(),
            id,
            parent
        );
        self.leftover += 1;
    }
}

pub struct SyncOrchestrator {
    categories: Arc<dyn CategoryRepositoryTrait>,
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
    goals: Arc<dyn GoalRepositoryTrait>,
    contributions: Arc<dyn ContributionRepositoryTrait>,
    gateway: Arc<dyn SyncGatewayTrait>,
    events: Arc<dyn DomainEventSink>,
    /// Held for the duration of a pass; a second caller fails fast.
    pass_guard: Mutex<()>,
}

impl SyncOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        categories: Arc<dyn CategoryRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
        goals: Arc<dyn GoalRepositoryTrait>,
        contributions: Arc<dyn ContributionRepositoryTrait>,
        gateway: Arc<dyn SyncGatewayTrait>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            categories,
            expenses,
            budgets,
            goals,
            contributions,
            gateway,
            events,
            pass_guard: Mutex::new(()),
        }
    }

    /// Runs one pass. Safe to call repeatedly; a pass over a fully synced
    /// store performs no gateway calls and no writes.
    pub async fn run_sync_pass(&self) -> Result<SyncOutcome> {
        let _guard = self
            .pass_guard
            .try_lock()
            .map_err(|_| Error::SyncInProgress)?;

        let mut ctx = PassContext::default();

        self.push_categories(&mut ctx).await?;
        self.push_expenses(&mut ctx).await?;
        self.push_budgets(&mut ctx).await?;
        self.push_goals(&mut ctx).await?;
        self.push_contributions(&mut ctx).await?;

        if ctx.summary.is_empty() && ctx.leftover == 0 {
            info!("[sync] nothing to synchronize");
            return Ok(SyncOutcome::UpToDate);
        }
        info!(
            "[sync] pass complete: {} pushed, {} still pending",
            ctx.summary.total(),
            ctx.leftover
        );
        Ok(SyncOutcome::Completed(ctx.summary))
    }

    /// Phase 1. Categories have no parent, so every unsynced one is sent.
    async fn push_categories(&self, ctx: &mut PassContext) -> Result<()> {
        for category in self.categories.list_unsynced()? {
            let request = CategorySyncRequest {
                local_id: category.local_id,
                name: category.name.clone(),
            };
            match self.gateway.sync_category(request).await {
                Ok(response) => {
                    self.categories.mark_synced(category.id, response.id).await?;
                    self.events.dispatch(DomainEvent::EntitySynced {
                        kind: EntityKind::Category,
                        id: category.id,
                    });
                    ctx.summary.categories += 1;
                }
                Err(error) => ctx.record_failure(EntityKind::Category, category.id, error)?,
            }
        }
        Ok(())
    }

    /// Phase 2. Expenses reference categories; the snapshot is taken after
    /// phase 1 so categories synced moments ago already resolve.
    async fn push_expenses(&self, ctx: &mut PassContext) -> Result<()> {
        self.log_backfill(EntityKind::Expense, self.expenses.backfill_local_ids().await?);
        let reconciler = IdReconciler::from_categories(&self.categories.list_all()?);

        for expense in self.expenses.list_unsynced()? {
            let Some(category_server_id) = reconciler.resolve(expense.category_id) else {
                ctx.gated(EntityKind::Expense, expense.id, "its category");
                continue;
            };
            let request = ExpenseCreateRequest {
                description: expense.description.clone(),
                amount: expense.amount,
                category_id: category_server_id,
                user_id: expense.user_id,
                expense_date: format_api_timestamp(expense.occurred_at),
                local_expense_id: expense.local_expense_id,
            };
            match self.gateway.create_expense(request).await {
                Ok(response) => {
                    self.expenses.mark_synced(expense.id, response.id).await?;
                    self.events.dispatch(DomainEvent::EntitySynced {
                        kind: EntityKind::Expense,
                        id: expense.id,
                    });
                    ctx.summary.expenses += 1;
                }
                Err(error) => ctx.record_failure(EntityKind::Expense, expense.id, error)?,
            }
        }
        Ok(())
    }

    /// Phase 3. Same shape as expenses, with a fresh category snapshot.
    async fn push_budgets(&self, ctx: &mut PassContext) -> Result<()> {
        self.log_backfill(EntityKind::Budget, self.budgets.backfill_local_ids().await?);
        let reconciler = IdReconciler::from_categories(&self.categories.list_all()?);

        for budget in self.budgets.list_unsynced()? {
            let Some(category_server_id) = reconciler.resolve(budget.category_id) else {
                ctx.gated(EntityKind::Budget, budget.id, "its category");
                continue;
            };
            let request = BudgetSyncRequest {
                local_id: budget.local_id,
                category_id: category_server_id,
                amount_limit: budget.amount_limit,
                month: budget.month,
                year: budget.year,
                user_id: budget.user_id,
            };
            match self.gateway.sync_budget(request).await {
                Ok(response) => {
                    self.budgets.mark_synced(budget.id, response.id).await?;
                    self.events.dispatch(DomainEvent::EntitySynced {
                        kind: EntityKind::Budget,
                        id: budget.id,
                    });
                    ctx.summary.budgets += 1;
                }
                Err(error) => ctx.record_failure(EntityKind::Budget, budget.id, error)?,
            }
        }
        Ok(())
    }

    /// Phase 4. Goals have no parent. The response's current amount is
    /// authoritative and overwrites the local value.
    async fn push_goals(&self, ctx: &mut PassContext) -> Result<()> {
        self.log_backfill(EntityKind::SavingsGoal, self.goals.backfill_local_ids().await?);

        for goal in self.goals.list_unsynced()? {
            let request = GoalCreateRequest {
                name: goal.name.clone(),
                target_amount: goal.target_amount,
                target_date: goal.target_date,
                user_id: goal.user_id,
            };
            match self.gateway.create_savings_goal(request).await {
                Ok(response) => {
                    self.goals.mark_synced(goal.id, response.id).await?;
                    self.goals
                        .set_current_amount(goal.id, response.current_amount)
                        .await?;
                    self.events.dispatch(DomainEvent::EntitySynced {
                        kind: EntityKind::SavingsGoal,
                        id: goal.id,
                    });
                    self.events
                        .dispatch(DomainEvent::GoalProgressUpdated { goal_id: goal.id });
                    ctx.summary.goals += 1;
                }
                Err(error) => ctx.record_failure(EntityKind::SavingsGoal, goal.id, error)?,
            }
        }
        Ok(())
    }

    /// Phase 5. Contributions post to their goal's server id; each success
    /// also overwrites the goal's running total with the server's value.
    async fn push_contributions(&self, ctx: &mut PassContext) -> Result<()> {
        self.log_backfill(
            EntityKind::Contribution,
            self.contributions.backfill_local_ids().await?,
        );
        let reconciler = IdReconciler::from_goals(&self.goals.list_all()?);

        for contribution in self.contributions.list_unsynced()? {
            let Some(goal_server_id) = reconciler.resolve(contribution.goal_id) else {
                ctx.gated(EntityKind::Contribution, contribution.id, "its goal");
                continue;
            };
            let request = ContributionRequest {
                amount: two_decimal_string(contribution.amount),
            };
            match self.gateway.add_contribution(goal_server_id, request).await {
                Ok(response) => {
                    self.contributions.mark_synced(contribution.id).await?;
                    self.goals
                        .set_current_amount(contribution.goal_id, response.current_amount)
                        .await?;
                    self.events.dispatch(DomainEvent::EntitySynced {
                        kind: EntityKind::Contribution,
                        id: contribution.id,
                    });
                    self.events.dispatch(DomainEvent::GoalProgressUpdated {
                        goal_id: contribution.goal_id,
                    });
                    ctx.summary.contributions += 1;
                }
                Err(error) => {
                    ctx.record_failure(EntityKind::Contribution, contribution.id, error)?
                }
            }
        }
        Ok(())
    }

    fn log_backfill(&self, kind: EntityKind, repaired: usize) {
        if repaired > 0 {
            info!("[sync] repaired {} {} mirror ids", repaired, kind.as_str());
        }
    }
}
