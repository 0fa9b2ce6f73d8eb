//! Derives team deployment state from callout membership.
//!
//! A team is deployed while an `Active` callout lists it; resources that sit in
//! a deployed team are reported `In Use`. Nothing here is stored: the server
//! and the dashboard both recompute it from the three collections.

use crate::domain::{Callout, CalloutStatus, Resource, ResourceStatus, Team, TeamStatus};
use crate::ids::{CalloutId, TeamId};
use crate::view::TeamView;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct DeploymentIndex {
    deployed_to: HashMap<TeamId, CalloutId>,
}

impl DeploymentIndex {
    pub fn from_callouts<C: AsRef<Callout>>(callouts: &[C]) -> Self {
        let mut deployed_to = HashMap::new();
        for callout in callouts
            .iter()
            .map(AsRef::as_ref)
            .filter(|callout| callout.status == CalloutStatus::Active)
        {
            for team_id in &callout.team_ids {
                deployed_to
                    .entry(team_id.clone())
                    .or_insert_with(|| callout.id.clone());
            }
        }
        Self { deployed_to }
    }

    pub fn deployed_to(&self, team_id: &TeamId) -> Option<&CalloutId> {
        self.deployed_to.get(team_id)
    }

    pub fn is_deployed(&self, team_id: &TeamId) -> bool {
        self.deployed_to.contains_key(team_id)
    }

    pub fn view(&self, team: Team) -> TeamView {
        let deployed_to = self.deployed_to(&team.id).cloned();
        let status = if deployed_to.is_some() {
            TeamStatus::Deployed
        } else {
            TeamStatus::Available
        };
        TeamView {
            team,
            status,
            deployed_to,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(rename = "deployedTeams")]
    pub teams: Vec<TeamView>,
    #[serde(rename = "deployedResources")]
    pub resources: Vec<Resource>,
}

impl Deployment {
    pub fn deployed_teams(&self) -> Vec<&TeamView> {
        self.teams
            .iter()
            .filter(|view| view.status == TeamStatus::Deployed)
            .collect()
    }

    pub fn deployed_resources(&self) -> Vec<&Resource> {
        let deployed: HashSet<&TeamId> = self
            .deployed_teams()
            .into_iter()
            .map(|view| &view.team.id)
            .collect();
        self.resources
            .iter()
            .filter(|resource| {
                resource
                    .team_id
                    .as_ref()
                    .is_some_and(|team_id| deployed.contains(team_id))
            })
            .collect()
    }
}

/// Re-tags every team and resource with its deployment state.
pub fn deploy_teams_and_resources<C, T, R>(
    callouts: &[C],
    teams: &[T],
    resources: &[R],
) -> Deployment
where
    C: AsRef<Callout>,
    T: AsRef<Team>,
    R: AsRef<Resource>,
{
    let index = DeploymentIndex::from_callouts(callouts);
    let teams: Vec<TeamView> = teams
        .iter()
        .map(|team| index.view(team.as_ref().clone()))
        .collect();
    let deployed: HashSet<&TeamId> = teams
        .iter()
        .filter(|view| view.status == TeamStatus::Deployed)
        .map(|view| &view.team.id)
        .collect();
    let resources = resources
        .iter()
        .map(|resource| {
            let mut resource = resource.as_ref().clone();
            if resource
                .team_id
                .as_ref()
                .is_some_and(|team_id| deployed.contains(team_id))
            {
                resource.status = ResourceStatus::InUse;
            }
            resource
        })
        .collect();

    Deployment { teams, resources }
}
