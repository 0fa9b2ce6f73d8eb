//! Assignment rules for resources, teams and callouts.
//!
//! Mutating operations hold the engine's state lock exclusively for their
//! whole duration and every public read holds it shared, so multi-step
//! changes (cascading deletes, merges) are never observed half-applied by
//! another request.

mod callouts;
mod join;
mod queries;
mod resources;
mod teams;

#[cfg(test)]
mod tests;

use sar_core::{
    Callout, CalloutId, ErrorCode, Resource, ResourceId, ResourceStatus, ResourceType,
    SarError, SarResult, Team, TeamId,
};
use sar_observability::record_operation;
use sar_storage::{CalloutRepository, EntityStore, ResourceRepository, TeamRepository};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Query parameters accepted when listing resources. `team` matches either the
/// team's name or its id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFilter {
    pub kind: Option<ResourceType>,
    pub status: Option<ResourceStatus>,
    pub team: Option<String>,
}

pub struct AssignmentEngine<S> {
    store: S,
    state_lock: RwLock<()>,
}

impl<S: EntityStore> AssignmentEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state_lock: RwLock::new(()),
        }
    }

    /// Direct store access. Reads here bypass the state lock.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn require_resource(&self, id: &ResourceId) -> SarResult<Resource> {
        ResourceRepository::get(&self.store, id)
            .await?
            .ok_or_else(|| SarError::not_found("Resource not found"))
    }

    async fn require_callout(&self, id: &CalloutId) -> SarResult<Callout> {
        CalloutRepository::get(&self.store, id)
            .await?
            .ok_or_else(|| SarError::not_found("Callout not found"))
    }

    async fn require_team(&self, id: &TeamId) -> SarResult<Team> {
        TeamRepository::get(&self.store, id)
            .await?
            .ok_or_else(|| SarError::not_found("Team not found"))
    }

    /// Loads a team that must be listed by `callout`.
    async fn require_callout_team(&self, callout: &Callout, team_id: &TeamId) -> SarResult<Team> {
        if !callout.team_ids.contains(team_id) {
            return Err(SarError::not_found("Team not found"));
        }
        self.require_team(team_id).await
    }
}

fn finish<T>(operation: &'static str, result: SarResult<T>) -> SarResult<T> {
    match &result {
        Ok(_) => {
            record_operation(operation, "ok");
            debug!(operation, "Engine operation applied");
        }
        Err(err) => {
            record_operation(operation, outcome_label(err.code));
            if err.code == ErrorCode::Internal {
                warn!(operation, error = %err, "Engine operation failed");
            } else {
                debug!(operation, error = %err, "Engine operation rejected");
            }
        }
    }
    result
}

fn outcome_label(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidInput => "invalid_input",
        ErrorCode::NotFound => "not_found",
        ErrorCode::Internal => "internal",
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
