use std::sync::Arc;

use async_trait::async_trait;

use super::{Category, CategoryRepositoryTrait, NewCategory};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, EntityKind};

/// Application-facing category operations.
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    async fn create_category(&self, name: &str) -> Result<Category>;
    fn list_categories(&self) -> Result<Vec<Category>>;
    fn find_by_name(&self, name: &str) -> Result<Option<Category>>;
}

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
    events: Arc<dyn DomainEventSink>,
}

impl CategoryService {
    pub fn new(
        repository: Arc<dyn CategoryRepositoryTrait>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self { repository, events }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn create_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Category name cannot be empty"));
        }

        let category = self
            .repository
            .insert(NewCategory {
                name: name.to_string(),
            })
            .await?;
        self.events.dispatch(DomainEvent::EntityCreated {
            kind: EntityKind::Category,
            id: category.id,
        });
        Ok(category)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        self.repository.list_all()
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.repository.find_by_name(name.trim())
    }
}
