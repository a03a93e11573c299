//! Domain events dispatched after successful local mutations.
//!
//! Front ends subscribe through [`DomainEventSink`] and refresh whatever
//! view the event names. Services and the sync engine dispatch; nothing in
//! the engine blocks on a sink.

use serde::{Deserialize, Serialize};

/// The five locally stored entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Category,
    Expense,
    Budget,
    SavingsGoal,
    Contribution,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Expense => "expense",
            EntityKind::Budget => "budget",
            EntityKind::SavingsGoal => "savings_goal",
            EntityKind::Contribution => "contribution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    EntityCreated { kind: EntityKind, id: i64 },
    EntityDeleted { kind: EntityKind, id: i64 },
    EntitySynced { kind: EntityKind, id: i64 },
    /// A goal's current amount changed, locally or by authoritative
    /// overwrite during sync.
    GoalProgressUpdated { goal_id: i64 },
}

pub trait DomainEventSink: Send + Sync {
    fn dispatch(&self, event: DomainEvent);
}

/// Sink that drops every event, for contexts with no subscriber.
#[derive(Debug, Default, Clone)]
pub struct NoopEventSink;

impl DomainEventSink for NoopEventSink {
    fn dispatch(&self, _event: DomainEvent) {}
}
