use sar_core::{
    deploy_teams_and_resources, Deployment, ResourceType, ResourceView, SarResult, TeamView,
};
use sar_storage::{CalloutRepository, EntityStore, ResourceRepository, TeamRepository};

use crate::AssignmentEngine;

impl<S: EntityStore> AssignmentEngine<S> {
    /// Vehicles that no team has claimed yet.
    pub async fn available_vehicles(&self) -> SarResult<Vec<ResourceView>> {
        let _guard = self.state_lock.read().await;
        let joiner = self.joiner().await?;
        Ok(ResourceRepository::list(&self.store)
            .await?
            .into_iter()
            .filter(|resource| resource.kind == ResourceType::Vehicles && resource.team_id.is_none())
            .map(|resource| joiner.resource(resource))
            .collect())
    }

    /// Teams with at least one person in them that are not currently deployed.
    pub async fn deployable_teams(&self) -> SarResult<Vec<TeamView>> {
        let _guard = self.state_lock.read().await;
        let joiner = self.joiner().await?;
        let resources = ResourceRepository::list(&self.store).await?;
        Ok(TeamRepository::list(&self.store)
            .await?
            .into_iter()
            .filter(|team| !joiner.is_deployed(&team.id))
            .filter(|team| {
                resources.iter().any(|resource| {
                    resource.kind == ResourceType::Personnel
                        && resource.team_id.as_ref() == Some(&team.id)
                })
            })
            .map(|team| joiner.team(team))
            .collect())
    }

    pub async fn deployment(&self) -> SarResult<Deployment> {
        let _guard = self.state_lock.read().await;
        let callouts = CalloutRepository::list(&self.store).await?;
        let teams = TeamRepository::list(&self.store).await?;
        let resources = ResourceRepository::list(&self.store).await?;
        Ok(deploy_teams_and_resources(&callouts, &teams, &resources))
    }
}
