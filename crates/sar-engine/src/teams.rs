use sar_core::{
    now, team_color, CalloutId, NewTeam, RenameTeam, Resource, ResourceId, ResourceStatus,
    SarError, SarResult, Team, TeamAssignment, TeamId, TeamType, TeamView,
};
use sar_storage::{CalloutRepository, EntityStore, ResourceRepository, TeamRepository};
use tracing::{debug, info};

use crate::{finish, push_unique, AssignmentEngine};

impl<S: EntityStore> AssignmentEngine<S> {
    /// Creates a team, standalone or inside `request.callout_id`.
    ///
    /// The colour defaults to the lookup for the first word of the name. A
    /// vehicle team created with a `vehicle_id` takes that vehicle straight away.
    pub async fn create_team(&self, request: NewTeam) -> SarResult<TeamView> {
        let _guard = self.state_lock.write().await;
        let result = self.create_team_locked(request).await;
        finish("create_team", result)
    }

    pub async fn create_team_in_callout(
        &self,
        callout_id: &CalloutId,
        mut request: NewTeam,
    ) -> SarResult<TeamView> {
        request.callout_id = Some(callout_id.clone());
        self.create_team(request).await
    }

    async fn create_team_locked(&self, request: NewTeam) -> SarResult<TeamView> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(SarError::invalid_input("Invalid team name"));
        }
        let callout = match request.callout_id.as_ref() {
            Some(id) => Some(self.require_callout(id).await?),
            None => None,
        };

        let color = request
            .color
            .filter(|color| !color.trim().is_empty())
            .unwrap_or_else(|| team_color(&name).to_string());
        let mut team = Team {
            id: TeamId::new(),
            name,
            kind: request.kind,
            color,
            callout_id: request.callout_id,
            vehicle_id: request.vehicle_id,
            assigned_resources: Vec::new(),
            location: request.location,
            grid_reference: request.grid_reference,
            created_at: now(),
        };

        if team.kind == TeamType::Vehicle {
            if let Some(vehicle_id) = team.vehicle_id.clone() {
                match ResourceRepository::get(&self.store, &vehicle_id).await? {
                    Some(vehicle) => {
                        self.attach_to_team(&mut team, vehicle).await?;
                    }
                    None => debug!(vehicle_id = %vehicle_id, "Vehicle for new team not found"),
                }
            }
        }

        TeamRepository::upsert(&self.store, team.clone()).await?;
        if let Some(mut callout) = callout {
            push_unique(&mut callout.team_ids, team.id.clone());
            CalloutRepository::upsert(&self.store, callout).await?;
        }
        info!(team_id = %team.id, name = %team.name, color = %team.color, "Team created");

        Ok(self.joiner().await?.team(team))
    }

    pub async fn get_team(&self, id: &TeamId) -> SarResult<TeamView> {
        let _guard = self.state_lock.read().await;
        let team = self.require_team(id).await?;
        Ok(self.joiner().await?.team(team))
    }

    pub async fn list_teams(&self) -> SarResult<Vec<TeamView>> {
        let _guard = self.state_lock.read().await;
        let joiner = self.joiner().await?;
        Ok(TeamRepository::list(&self.store)
            .await?
            .into_iter()
            .map(|team| joiner.team(team))
            .collect())
    }

    /// Renames a team. Members reference the team by id, so nothing else moves.
    pub async fn rename_team(&self, id: &TeamId, request: RenameTeam) -> SarResult<TeamView> {
        let _guard = self.state_lock.write().await;
        let result = self.rename_team_locked(id, request).await;
        finish("rename_team", result)
    }

    async fn rename_team_locked(&self, id: &TeamId, request: RenameTeam) -> SarResult<TeamView> {
        let mut team = self.require_team(id).await?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(SarError::invalid_input("Invalid team name"));
        }
        team.name = name.to_string();
        if request.location.is_some() {
            team.location = request.location;
        }
        if request.grid_reference.is_some() {
            team.grid_reference = request.grid_reference;
        }
        TeamRepository::upsert(&self.store, team.clone()).await?;
        Ok(self.joiner().await?.team(team))
    }

    pub async fn delete_team(&self, id: &TeamId) -> SarResult<()> {
        let _guard = self.state_lock.write().await;
        let result = self.delete_team_locked(id).await;
        finish("delete_team", result)
    }

    async fn delete_team_locked(&self, id: &TeamId) -> SarResult<()> {
        self.require_team(id).await?;
        self.remove_team(id).await
    }

    /// Deletes a team that must belong to `callout_id`.
    pub async fn delete_team_in_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> SarResult<()> {
        let _guard = self.state_lock.write().await;
        let result = self.delete_team_in_callout_locked(callout_id, team_id).await;
        finish("delete_team_in_callout", result)
    }

    async fn delete_team_in_callout_locked(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> SarResult<()> {
        let callout = self.require_callout(callout_id).await?;
        self.require_callout_team(&callout, team_id).await?;
        self.remove_team(team_id).await
    }

    pub async fn assign_resource_to_team(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let _guard = self.state_lock.write().await;
        let result = self.assign_resource_to_team_locked(team_id, resource_id).await;
        finish("assign_resource_to_team", result)
    }

    async fn assign_resource_to_team_locked(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let mut team = self.require_team(team_id).await?;
        let resource = self.require_resource(resource_id).await?;

        let resource = self.attach_to_team(&mut team, resource).await?;
        TeamRepository::upsert(&self.store, team.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(TeamAssignment {
            team: joiner.team(team),
            resource: joiner.resource(resource),
            callout: None,
        })
    }

    /// Assigns within a callout's team and makes sure the callout lists the
    /// resource too.
    pub async fn assign_resource_to_team_in_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let _guard = self.state_lock.write().await;
        let result = self
            .assign_resource_to_team_in_callout_locked(callout_id, team_id, resource_id)
            .await;
        finish("assign_resource_to_team_in_callout", result)
    }

    async fn assign_resource_to_team_in_callout_locked(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let mut callout = self.require_callout(callout_id).await?;
        let mut team = self.require_callout_team(&callout, team_id).await?;
        let resource = self.require_resource(resource_id).await?;

        let resource = self.attach_to_team(&mut team, resource).await?;
        TeamRepository::upsert(&self.store, team.clone()).await?;

        push_unique(&mut callout.assigned_resources, resource_id.clone());
        CalloutRepository::upsert(&self.store, callout.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(TeamAssignment {
            team: joiner.team(team),
            resource: joiner.resource(resource),
            callout: Some(joiner.callout(callout)),
        })
    }

    pub async fn unassign_resource_from_team(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let _guard = self.state_lock.write().await;
        let result = self
            .unassign_resource_from_team_locked(team_id, resource_id)
            .await;
        finish("unassign_resource_from_team", result)
    }

    async fn unassign_resource_from_team_locked(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let mut team = self.require_team(team_id).await?;
        let resource = self.require_resource(resource_id).await?;

        let resource = self.release_from_team(&mut team, resource).await?;
        TeamRepository::upsert(&self.store, team.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(TeamAssignment {
            team: joiner.team(team),
            resource: joiner.resource(resource),
            callout: None,
        })
    }

    /// Takes the resource out of a callout's team. The resource stays on the
    /// callout itself.
    pub async fn unassign_resource_from_team_in_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let _guard = self.state_lock.write().await;
        let result = self
            .unassign_resource_from_team_in_callout_locked(callout_id, team_id, resource_id)
            .await;
        finish("unassign_resource_from_team_in_callout", result)
    }

    async fn unassign_resource_from_team_in_callout_locked(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> SarResult<TeamAssignment> {
        let callout = self.require_callout(callout_id).await?;
        let mut team = self.require_callout_team(&callout, team_id).await?;
        let resource = self.require_resource(resource_id).await?;

        let resource = self.release_from_team(&mut team, resource).await?;
        TeamRepository::upsert(&self.store, team.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(TeamAssignment {
            team: joiner.team(team),
            resource: joiner.resource(resource),
            callout: Some(joiner.callout(callout)),
        })
    }

    /// Adds `resource` to `team` and points it at the team, pulling it out of
    /// whichever team held it before. Persists the resource and any previous
    /// team; the caller persists `team`.
    pub(crate) async fn attach_to_team(
        &self,
        team: &mut Team,
        mut resource: Resource,
    ) -> SarResult<Resource> {
        if let Some(previous) = resource.team_id.as_ref().filter(|id| **id != team.id) {
            if let Some(mut other) = TeamRepository::get(&self.store, previous).await? {
                other.assigned_resources.retain(|id| *id != resource.id);
                TeamRepository::upsert(&self.store, other).await?;
            }
        }

        push_unique(&mut team.assigned_resources, resource.id.clone());
        resource.team_id = Some(team.id.clone());
        if resource.kind.is_kit() {
            resource.status = ResourceStatus::InUse;
        }
        ResourceRepository::upsert(&self.store, resource.clone()).await?;
        Ok(resource)
    }

    /// Drops `resource` from `team`. The resource's reference is only cleared
    /// when it points at this team. Persists the resource; the caller persists
    /// `team`.
    pub(crate) async fn release_from_team(
        &self,
        team: &mut Team,
        mut resource: Resource,
    ) -> SarResult<Resource> {
        team.assigned_resources.retain(|id| *id != resource.id);
        if resource.team_id.as_ref() == Some(&team.id) {
            resource.team_id = None;
            if resource.kind.is_kit() {
                resource.status = ResourceStatus::Available;
            }
            ResourceRepository::upsert(&self.store, resource.clone()).await?;
        }
        Ok(resource)
    }

    /// Deletes a team, clears the reference on every resource that pointed at
    /// it and unlinks it from every callout. Resource statuses are left alone.
    pub(crate) async fn remove_team(&self, team_id: &TeamId) -> SarResult<()> {
        let mut released = 0usize;
        for mut resource in ResourceRepository::list(&self.store).await? {
            if resource.team_id.as_ref() == Some(team_id) {
                resource.team_id = None;
                ResourceRepository::upsert(&self.store, resource).await?;
                released += 1;
            }
        }
        for mut callout in CalloutRepository::list(&self.store).await? {
            if callout.team_ids.contains(team_id) {
                callout.team_ids.retain(|id| id != team_id);
                CalloutRepository::upsert(&self.store, callout).await?;
            }
        }
        TeamRepository::delete(&self.store, team_id).await?;
        info!(team_id = %team_id, released, "Team deleted");
        Ok(())
    }
}
