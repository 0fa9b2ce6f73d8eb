use sar_core::{
    Callout, CalloutView, DeploymentIndex, Resource, ResourceView, SarResult, Team, TeamId,
    TeamView,
};
use sar_storage::{CalloutRepository, EntityStore, TeamRepository};
use std::collections::HashMap;

use crate::AssignmentEngine;

/// Snapshot of teams and callout membership used to build wire views.
pub(crate) struct Joiner {
    teams: HashMap<TeamId, Team>,
    index: DeploymentIndex,
}

impl Joiner {
    pub(crate) fn resource(&self, resource: Resource) -> ResourceView {
        let team = resource
            .team_id
            .as_ref()
            .and_then(|id| self.teams.get(id))
            .map(|team| team.name.clone());
        ResourceView { resource, team }
    }

    pub(crate) fn team(&self, team: Team) -> TeamView {
        self.index.view(team)
    }

    pub(crate) fn callout(&self, callout: Callout) -> CalloutView {
        let teams = callout
            .team_ids
            .iter()
            .filter_map(|id| self.teams.get(id))
            .map(|team| self.index.view(team.clone()))
            .collect();
        CalloutView { callout, teams }
    }

    pub(crate) fn is_deployed(&self, team_id: &TeamId) -> bool {
        self.index.is_deployed(team_id)
    }
}

impl<S: EntityStore> AssignmentEngine<S> {
    pub(crate) async fn joiner(&self) -> SarResult<Joiner> {
        let teams = TeamRepository::list(&self.store)
            .await?
            .into_iter()
            .map(|team| (team.id.clone(), team))
            .collect();
        let callouts = CalloutRepository::list(&self.store).await?;
        Ok(Joiner {
            teams,
            index: DeploymentIndex::from_callouts(&callouts),
        })
    }
}
