use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{
    Contribution, ContributionRepositoryTrait, GoalRepositoryTrait, NewContribution,
    NewSavingsGoal, SavingsGoal,
};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, EntityKind};

/// Application-facing savings-goal operations. Goal deletion lives on the
/// delete coordinator in `sync`, not here, because it talks to the server.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn add_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    fn list_goals(&self) -> Result<Vec<SavingsGoal>>;
    fn get_goal(&self, goal_id: i64) -> Result<SavingsGoal>;
    async fn contribute(&self, goal_id: i64, amount: Decimal) -> Result<Contribution>;
    fn list_contributions(&self, goal_id: i64) -> Result<Vec<Contribution>>;
}

pub struct GoalService {
    goals: Arc<dyn GoalRepositoryTrait>,
    contributions: Arc<dyn ContributionRepositoryTrait>,
    events: Arc<dyn DomainEventSink>,
}

impl GoalService {
    pub fn new(
        goals: Arc<dyn GoalRepositoryTrait>,
        contributions: Arc<dyn ContributionRepositoryTrait>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            goals,
            contributions,
            events,
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn add_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        if new_goal.name.trim().is_empty() {
            return Err(Error::validation("Goal name cannot be empty"));
        }
        if new_goal.target_amount <= Decimal::ZERO {
            return Err(Error::validation("Goal target must be positive"));
        }

        let goal = self
            .goals
            .insert(NewSavingsGoal {
                name: new_goal.name.trim().to_string(),
                ..new_goal
            })
            .await?;
        self.events.dispatch(DomainEvent::EntityCreated {
            kind: EntityKind::SavingsGoal,
            id: goal.id,
        });
        Ok(goal)
    }

    fn list_goals(&self) -> Result<Vec<SavingsGoal>> {
        self.goals.list_all()
    }

    fn get_goal(&self, goal_id: i64) -> Result<SavingsGoal> {
        self.goals
            .find_by_id(goal_id)?
            .ok_or_else(|| Error::not_found(format!("goal {}", goal_id)))
    }

    async fn contribute(&self, goal_id: i64, amount: Decimal) -> Result<Contribution> {
        if amount <= Decimal::ZERO {
            return Err(Error::validation("Contribution amount must be positive"));
        }
        let goal = self
            .goals
            .find_by_id(goal_id)?
            .ok_or_else(|| Error::not_found(format!("goal {}", goal_id)))?;

        let contribution = self
            .contributions
            .insert(NewContribution {
                goal_id,
                amount,
                created_at: Utc::now(),
            })
            .await?;
        // Advance the local running total right away; the next sync replaces
        // it with the server's recomputed value.
        self.goals
            .set_current_amount(goal_id, goal.current_amount + amount)
            .await?;

        self.events.dispatch(DomainEvent::EntityCreated {
            kind: EntityKind::Contribution,
            id: contribution.id,
        });
        self.events
            .dispatch(DomainEvent::GoalProgressUpdated { goal_id });
        Ok(contribution)
    }

    fn list_contributions(&self, goal_id: i64) -> Result<Vec<Contribution>> {
        self.contributions.list_for_goal(goal_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::events::NoopEventSink;

    #[derive(Default)]
    struct StubGoalStore {
        goals: Mutex<Vec<SavingsGoal>>,
        contributions: Mutex<Vec<Contribution>>,
        next_id: AtomicI64,
    }

    impl StubGoalStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                next_id: AtomicI64::new(1),
                ..Default::default()
            })
        }

        fn alloc(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GoalRepositoryTrait for StubGoalStore {
        async fn insert(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
            let id = self.alloc();
            let goal = SavingsGoal {
                id,
                name: new_goal.name,
                target_amount: new_goal.target_amount,
                current_amount: Decimal::ZERO,
                target_date: new_goal.target_date,
                user_id: 1,
                synced: false,
                server_id: None,
                local_id: id,
            };
            self.goals.lock().unwrap().push(goal.clone());
            Ok(goal)
        }

        fn list_all(&self) -> Result<Vec<SavingsGoal>> {
            Ok(self.goals.lock().unwrap().clone())
        }

        fn list_unsynced(&self) -> Result<Vec<SavingsGoal>> {
            Ok(Vec::new())
        }

        fn find_by_id(&self, goal_id: i64) -> Result<Option<SavingsGoal>> {
            Ok(self
                .goals
                .lock()
                .unwrap()
                .iter()
                .find(|goal| goal.id == goal_id)
                .cloned())
        }

        async fn delete(&self, goal_id: i64) -> Result<usize> {
            let mut goals = self.goals.lock().unwrap();
            let before = goals.len();
            goals.retain(|goal| goal.id != goal_id);
            Ok(before - goals.len())
        }

        async fn mark_synced(&self, _goal_id: i64, _server_id: i64) -> Result<()> {
            Ok(())
        }

        async fn set_current_amount(&self, goal_id: i64, amount: Decimal) -> Result<()> {
            let mut goals = self.goals.lock().unwrap();
            let goal = goals
                .iter_mut()
                .find(|goal| goal.id == goal_id)
                .ok_or_else(|| Error::not_found(format!("goal {}", goal_id)))?;
            goal.current_amount = amount;
            Ok(())
        }

        async fn backfill_local_ids(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[async_trait]
    impl ContributionRepositoryTrait for StubGoalStore {
        async fn insert(&self, new_contribution: NewContribution) -> Result<Contribution> {
            let id = self.alloc();
            let contribution = Contribution {
                id,
                goal_id: new_contribution.goal_id,
                amount: new_contribution.amount,
                created_at: new_contribution.created_at,
                synced: false,
                server_id: None,
                local_id: id,
            };
            self.contributions.lock().unwrap().push(contribution.clone());
            Ok(contribution)
        }

        fn list_for_goal(&self, goal_id: i64) -> Result<Vec<Contribution>> {
            Ok(self
                .contributions
                .lock()
                .unwrap()
                .iter()
                .filter(|contribution| contribution.goal_id == goal_id)
                .cloned()
                .collect())
        }

        fn list_unsynced(&self) -> Result<Vec<Contribution>> {
            Ok(Vec::new())
        }

        async fn delete_for_goal(&self, _goal_id: i64) -> Result<usize> {
            Ok(0)
        }

        async fn mark_synced(&self, _contribution_id: i64) -> Result<()> {
            Ok(())
        }

        async fn backfill_local_ids(&self) -> Result<usize> {
            Ok(0)
        }
    }

    fn service(store: &Arc<StubGoalStore>) -> GoalService {
        GoalService::new(store.clone(), store.clone(), Arc::new(NoopEventSink))
    }

    #[tokio::test]
    async fn rejects_blank_name_and_non_positive_target() {
        let store = StubGoalStore::new();
        let service = service(&store);

        let blank = service
            .add_goal(NewSavingsGoal {
                name: "   ".to_string(),
                target_amount: dec!(100),
                target_date: None,
            })
            .await;
        assert!(matches!(blank, Err(Error::Validation(_))));

        let zero = service
            .add_goal(NewSavingsGoal {
                name: "Bike".to_string(),
                target_amount: Decimal::ZERO,
                target_date: None,
            })
            .await;
        assert!(matches!(zero, Err(Error::Validation(_))));
        assert!(store.goals.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn contribution_advances_local_total_until_sync_corrects_it() {
        let store = StubGoalStore::new();
        let service = service(&store);
        let goal = service
            .add_goal(NewSavingsGoal {
                name: "Bike".to_string(),
                target_amount: dec!(1500),
                target_date: None,
            })
            .await
            .unwrap();

        service.contribute(goal.id, dec!(40)).await.unwrap();
        service.contribute(goal.id, dec!(10)).await.unwrap();

        assert_eq!(service.get_goal(goal.id).unwrap().current_amount, dec!(50));
        assert_eq!(service.list_contributions(goal.id).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn contribution_to_missing_goal_is_rejected_before_any_write() {
        let store = StubGoalStore::new();
        let service = service(&store);

        let missing = service.contribute(42, dec!(10)).await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
        assert!(store.contributions.lock().unwrap().is_empty());
    }
}
