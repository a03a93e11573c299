use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{Budget, BudgetRepositoryTrait, NewBudget};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, EntityKind};

/// Application-facing budget operations.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn set_budget(&self, new_budget: NewBudget) -> Result<Budget>;
    fn list_budgets(&self) -> Result<Vec<Budget>>;
    fn list_budgets_for_month(&self, month: i32, year: i32) -> Result<Vec<Budget>>;
    async fn delete_budget(&self, budget_id: i64) -> Result<()>;
}

pub struct BudgetService {
    budgets: Arc<dyn BudgetRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
    events: Arc<dyn DomainEventSink>,
}

impl BudgetService {
    pub fn new(
        budgets: Arc<dyn BudgetRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            budgets,
            categories,
            events,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn set_budget(&self, new_budget: NewBudget) -> Result<Budget> {
        if new_budget.amount_limit <= Decimal::ZERO {
            return Err(Error::validation("Budget limit must be positive"));
        }
        if !(1..=12).contains(&new_budget.month) {
            return Err(Error::validation("Month must be between 1 and 12"));
        }
        if self
            .categories
            .find_by_id(new_budget.category_id)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "category {}",
                new_budget.category_id
            )));
        }
        // One budget per (category, month, year).
        if let Some(existing) =
            self.budgets
                .find_existing(new_budget.category_id, new_budget.month, new_budget.year)?
        {
            return Err(Error::validation(format!(
                "A budget for this category already exists for {}/{} (id {})",
                existing.month, existing.year, existing.id
            )));
        }

        let budget = self.budgets.insert(new_budget).await?;
        self.events.dispatch(DomainEvent::EntityCreated {
            kind: EntityKind::Budget,
            id: budget.id,
        });
        Ok(budget)
    }

    fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.budgets.list_all()
    }

    fn list_budgets_for_month(&self, month: i32, year: i32) -> Result<Vec<Budget>> {
        self.budgets.list_for_month(month, year)
    }

    async fn delete_budget(&self, budget_id: i64) -> Result<()> {
        let affected = self.budgets.delete(budget_id).await?;
        if affected == 0 {
            return Err(Error::not_found(format!("budget {}", budget_id)));
        }
        self.events.dispatch(DomainEvent::EntityDeleted {
            kind: EntityKind::Budget,
            id: budget_id,
        });
        Ok(())
    }
}
