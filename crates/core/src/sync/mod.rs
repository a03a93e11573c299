//! The push-sync engine: ordered pass, id reconciliation, goal deletion.

mod delete_coordinator;
mod gateway;
mod orchestrator;
mod reconciler;

pub use delete_coordinator::*;
pub use gateway::*;
pub use orchestrator::*;
pub use reconciler::*;
