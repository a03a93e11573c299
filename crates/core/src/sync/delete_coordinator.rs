//! Two-phase savings-goal deletion.
//!
//! The remote delete is best effort: a 404 means the goal was already gone
//! and counts as success, any other failure is downgraded to a warning.
//! The local cascade (contributions first, then the goal) runs no matter
//! what, so the user's delete always takes effect on the device.

use std::sync::Arc;

use log::warn;

use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, EntityKind};
use crate::goals::{ContributionRepositoryTrait, GoalRepositoryTrait};

use super::gateway::{RemoteDeleteStatus, SyncGatewayTrait};

/// How the remote half of the deletion went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDeleteOutcome {
    /// The service confirmed the delete.
    Deleted,
    /// The service answered 404; nothing to delete remotely.
    AlreadyAbsent,
    /// The service answered with some other error status.
    Failed { status: u16 },
    /// No usable answer from the service.
    Unreachable,
    /// The goal never synced, so the server was never asked.
    SkippedUnsynced,
}

impl RemoteDeleteOutcome {
    /// True when the goal is known to be absent remotely after this call.
    pub fn confirmed_absent(&self) -> bool {
        matches!(
            self,
            RemoteDeleteOutcome::Deleted
                | RemoteDeleteOutcome::AlreadyAbsent
                | RemoteDeleteOutcome::SkippedUnsynced
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub remote: RemoteDeleteOutcome,
    pub contributions_removed: usize,
}

pub struct GoalDeleteCoordinator {
    goals: Arc<dyn GoalRepositoryTrait>,
    contributions: Arc<dyn ContributionRepositoryTrait>,
    gateway: Arc<dyn SyncGatewayTrait>,
    events: Arc<dyn DomainEventSink>,
}

impl GoalDeleteCoordinator {
    pub fn new(
        goals: Arc<dyn GoalRepositoryTrait>,
        contributions: Arc<dyn ContributionRepositoryTrait>,
        gateway: Arc<dyn SyncGatewayTrait>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            goals,
            contributions,
            gateway,
            events,
        }
    }

    pub async fn delete_goal(&self, goal_id: i64) -> Result<DeleteOutcome> {
        let goal = self
            .goals
            .find_by_id(goal_id)?
            .ok_or_else(|| Error::not_found(format!("goal {}", goal_id)))?;

        let remote = match goal.server_id {
            None => RemoteDeleteOutcome::SkippedUnsynced,
            Some(server_id) => match self.gateway.delete_savings_goal(server_id).await {
                Ok(RemoteDeleteStatus::Deleted) => RemoteDeleteOutcome::Deleted,
                Ok(RemoteDeleteStatus::AlreadyAbsent) => RemoteDeleteOutcome::AlreadyAbsent,
                Err(error) => match error.status_code() {
                    Some(status) => {
                        warn!(
                            "[sync] server refused delete of goal {} (status {}), removing locally anyway",
                            goal_id, status
                        );
                        RemoteDeleteOutcome::Failed { status }
                    }
                    None => {
                        warn!(
                            "[sync] server unreachable deleting goal {}, removing locally anyway: {}",
                            goal_id, error
                        );
                        RemoteDeleteOutcome::Unreachable
                    }
                },
            },
        };

        let contributions_removed = self.contributions.delete_for_goal(goal.id).await?;
        self.goals.delete(goal.id).await?;
        self.events.dispatch(DomainEvent::EntityDeleted {
            kind: EntityKind::SavingsGoal,
            id: goal.id,
        });

        Ok(DeleteOutcome {
            remote,
            contributions_removed,
        })
    }
}
