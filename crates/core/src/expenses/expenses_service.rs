use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{Expense, ExpenseRepositoryTrait, NewExpense};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, EntityKind};

/// Application-facing expense operations.
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    async fn add_expense(&self, new_expense: NewExpense) -> Result<Expense>;
    fn list_expenses(&self) -> Result<Vec<Expense>>;
    async fn delete_expense(&self, expense_id: i64) -> Result<()>;
}

pub struct ExpenseService {
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
    events: Arc<dyn DomainEventSink>,
}

impl ExpenseService {
    pub fn new(
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            expenses,
            categories,
            events,
        }
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    async fn add_expense(&self, new_expense: NewExpense) -> Result<Expense> {
        if new_expense.description.trim().is_empty() {
            return Err(Error::validation("Expense description cannot be empty"));
        }
        if new_expense.amount <= Decimal::ZERO {
            return Err(Error::validation("Expense amount must be positive"));
        }
        if self
            .categories
            .find_by_id(new_expense.category_id)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "category {}",
                new_expense.category_id
            )));
        }

        let expense = self.expenses.insert(new_expense).await?;
        self.events.dispatch(DomainEvent::EntityCreated {
            kind: EntityKind::Expense,
            id: expense.id,
        });
        Ok(expense)
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.expenses.list_all()
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<()> {
        let affected = self.expenses.delete(expense_id).await?;
        if affected == 0 {
            return Err(Error::not_found(format!("expense {}", expense_id)));
        }
        self.events.dispatch(DomainEvent::EntityDeleted {
            kind: EntityKind::Expense,
            id: expense_id,
        });
        Ok(())
    }
}
