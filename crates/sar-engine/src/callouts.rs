use sar_core::{
    now, Callout, CalloutAssignment, CalloutId, CalloutPatch, CalloutStatus, CalloutTeamLink,
    CalloutView, MergeOutcome, MergeTeams, NewCallout, ResourceId, ResourceStatus, SarError,
    SarResult, TeamId,
};
use sar_storage::{CalloutRepository, EntityStore, ResourceRepository, TeamRepository};
use std::collections::HashSet;
use tracing::info;

use crate::{finish, push_unique, AssignmentEngine};

impl<S: EntityStore> AssignmentEngine<S> {
    pub async fn create_callout(&self, request: NewCallout) -> SarResult<CalloutView> {
        let _guard = self.state_lock.write().await;
        let result = self.create_callout_locked(request).await;
        finish("create_callout", result)
    }

    async fn create_callout_locked(&self, request: NewCallout) -> SarResult<CalloutView> {
        let callout = Callout {
            id: CalloutId::new(),
            title: request.title,
            location: request.location,
            grid_reference: request.grid_reference,
            description: request.description,
            weather: request.weather,
            incident_commander: request.incident_commander,
            start_time: request.start_time,
            status: request.status.unwrap_or(CalloutStatus::Active),
            assigned_resources: Vec::new(),
            team_ids: Vec::new(),
            created_at: now(),
        };
        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        info!(callout_id = %callout.id, title = %callout.title, "Callout created");
        Ok(self.joiner().await?.callout(callout))
    }

    pub async fn get_callout(&self, id: &CalloutId) -> SarResult<CalloutView> {
        let _guard = self.state_lock.read().await;
        let callout = self.require_callout(id).await?;
        Ok(self.joiner().await?.callout(callout))
    }

    pub async fn list_callouts(&self) -> SarResult<Vec<CalloutView>> {
        let _guard = self.state_lock.read().await;
        let joiner = self.joiner().await?;
        Ok(CalloutRepository::list(&self.store)
            .await?
            .into_iter()
            .map(|callout| joiner.callout(callout))
            .collect())
    }

    pub async fn update_callout(
        &self,
        id: &CalloutId,
        patch: CalloutPatch,
    ) -> SarResult<CalloutView> {
        let _guard = self.state_lock.write().await;
        let result = self.update_callout_locked(id, patch).await;
        finish("update_callout", result)
    }

    /// Patches the title and, when given, the grid reference.
    pub async fn rename_callout(
        &self,
        id: &CalloutId,
        title: &str,
        grid_reference: Option<String>,
    ) -> SarResult<CalloutView> {
        let patch = CalloutPatch {
            title: Some(title.to_string()),
            grid_reference,
            ..CalloutPatch::default()
        };
        self.update_callout(id, patch).await
    }

    async fn update_callout_locked(
        &self,
        id: &CalloutId,
        patch: CalloutPatch,
    ) -> SarResult<CalloutView> {
        let mut callout = self.require_callout(id).await?;
        if let Some(title) = patch.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(SarError::invalid_input("Invalid callout title"));
            }
            callout.title = title.to_string();
        }
        if let Some(location) = patch.location {
            callout.location = location;
        }
        if let Some(grid_reference) = patch.grid_reference {
            callout.grid_reference = Some(grid_reference);
        }
        if let Some(description) = patch.description {
            callout.description = description;
        }
        if let Some(weather) = patch.weather {
            callout.weather = Some(weather);
        }
        if let Some(commander) = patch.incident_commander {
            callout.incident_commander = Some(commander);
        }
        if let Some(start_time) = patch.start_time {
            callout.start_time = Some(start_time);
        }
        if let Some(status) = patch.status {
            callout.status = status;
        }
        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        Ok(self.joiner().await?.callout(callout))
    }

    /// Unassigns every resource from the callout's teams, deletes those teams,
    /// releases the directly assigned resources and finally drops the callout.
    pub async fn delete_callout(&self, id: &CalloutId) -> SarResult<()> {
        let _guard = self.state_lock.write().await;
        let result = self.delete_callout_locked(id).await;
        finish("delete_callout", result)
    }

    async fn delete_callout_locked(&self, id: &CalloutId) -> SarResult<()> {
        let callout = self.require_callout(id).await?;

        let mut team_ids = callout.team_ids.clone();
        for team in TeamRepository::list(&self.store).await? {
            if team.callout_id.as_ref() == Some(id) {
                push_unique(&mut team_ids, team.id);
            }
        }

        for team_id in &team_ids {
            let Some(mut team) = TeamRepository::get(&self.store, team_id).await? else {
                continue;
            };
            for resource_id in team.assigned_resources.clone() {
                if let Some(resource) = ResourceRepository::get(&self.store, &resource_id).await? {
                    self.release_from_team(&mut team, resource).await?;
                }
            }
            self.remove_team(team_id).await?;
        }

        for resource_id in &callout.assigned_resources {
            if let Some(mut resource) = ResourceRepository::get(&self.store, resource_id).await? {
                resource.status = ResourceStatus::Available;
                ResourceRepository::upsert(&self.store, resource).await?;
            }
        }

        CalloutRepository::delete(&self.store, id).await?;
        info!(
            callout_id = %id,
            teams = team_ids.len(),
            resources = callout.assigned_resources.len(),
            "Callout deleted"
        );
        Ok(())
    }

    /// Adds the resource to the callout once and marks it `In Use`.
    pub async fn assign_resource_to_callout(
        &self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> SarResult<CalloutAssignment> {
        let _guard = self.state_lock.write().await;
        let result = self
            .assign_resource_to_callout_locked(callout_id, resource_id)
            .await;
        finish("assign_resource_to_callout", result)
    }

    async fn assign_resource_to_callout_locked(
        &self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> SarResult<CalloutAssignment> {
        let mut callout = self.require_callout(callout_id).await?;
        let mut resource = self.require_resource(resource_id).await?;

        push_unique(&mut callout.assigned_resources, resource_id.clone());
        resource.status = ResourceStatus::InUse;

        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        ResourceRepository::upsert(&self.store, resource.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(CalloutAssignment {
            callout: joiner.callout(callout),
            resource: joiner.resource(resource),
        })
    }

    /// Removes the resource from the callout and marks it `Available`, even if
    /// a team in another callout still holds it.
    pub async fn unassign_resource_from_callout(
        &self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> SarResult<CalloutAssignment> {
        let _guard = self.state_lock.write().await;
        let result = self
            .unassign_resource_from_callout_locked(callout_id, resource_id)
            .await;
        finish("unassign_resource_from_callout", result)
    }

    async fn unassign_resource_from_callout_locked(
        &self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> SarResult<CalloutAssignment> {
        let mut callout = self.require_callout(callout_id).await?;
        let mut resource = self.require_resource(resource_id).await?;

        callout.assigned_resources.retain(|id| id != resource_id);
        resource.status = ResourceStatus::Available;

        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        ResourceRepository::upsert(&self.store, resource.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(CalloutAssignment {
            callout: joiner.callout(callout),
            resource: joiner.resource(resource),
        })
    }

    /// Moves a team into the callout. Deployment follows from membership.
    pub async fn link_team_to_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> SarResult<CalloutTeamLink> {
        let _guard = self.state_lock.write().await;
        let result = self.link_team_to_callout_locked(callout_id, team_id).await;
        finish("link_team_to_callout", result)
    }

    async fn link_team_to_callout_locked(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> SarResult<CalloutTeamLink> {
        let mut callout = self.require_callout(callout_id).await?;
        let mut team = self.require_team(team_id).await?;

        if let Some(previous) = team.callout_id.as_ref().filter(|id| *id != callout_id) {
            if let Some(mut other) = CalloutRepository::get(&self.store, previous).await? {
                other.team_ids.retain(|id| id != team_id);
                CalloutRepository::upsert(&self.store, other).await?;
            }
        }

        push_unique(&mut callout.team_ids, team_id.clone());
        team.callout_id = Some(callout_id.clone());

        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        TeamRepository::upsert(&self.store, team.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(CalloutTeamLink {
            callout: joiner.callout(callout),
            team: joiner.team(team),
        })
    }

    pub async fn unlink_team_from_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> SarResult<CalloutTeamLink> {
        let _guard = self.state_lock.write().await;
        let result = self
            .unlink_team_from_callout_locked(callout_id, team_id)
            .await;
        finish("unlink_team_from_callout", result)
    }

    async fn unlink_team_from_callout_locked(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> SarResult<CalloutTeamLink> {
        let mut callout = self.require_callout(callout_id).await?;
        let mut team = self.require_team(team_id).await?;

        callout.team_ids.retain(|id| id != team_id);
        if team.callout_id.as_ref() == Some(callout_id) {
            team.callout_id = None;
        }

        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        TeamRepository::upsert(&self.store, team.clone()).await?;

        let joiner = self.joiner().await?;
        Ok(CalloutTeamLink {
            callout: joiner.callout(callout),
            team: joiner.team(team),
        })
    }

    /// Collapses the callout's teams into `first_team_id`.
    ///
    /// The surviving team's members become exactly `resource_ids`; the other
    /// listed teams are deleted, and callout teams that were not listed are
    /// detached rather than deleted. Ids that no longer exist are skipped, so
    /// replaying a merge with stale ids is harmless.
    pub async fn merge_teams(
        &self,
        callout_id: &CalloutId,
        request: MergeTeams,
    ) -> SarResult<MergeOutcome> {
        let _guard = self.state_lock.write().await;
        let result = self.merge_teams_locked(callout_id, request).await;
        finish("merge_teams", result)
    }

    async fn merge_teams_locked(
        &self,
        callout_id: &CalloutId,
        request: MergeTeams,
    ) -> SarResult<MergeOutcome> {
        let mut callout = self.require_callout(callout_id).await?;
        if callout.team_ids.is_empty() {
            return Err(SarError::invalid_input("No teams to merge"));
        }
        if !callout.team_ids.contains(&request.first_team_id) {
            return Err(SarError::not_found("First team not found"));
        }
        let mut first = TeamRepository::get(&self.store, &request.first_team_id)
            .await?
            .ok_or_else(|| SarError::not_found("First team not found"))?;

        let mut members: Vec<ResourceId> = Vec::new();
        for resource_id in request.resource_ids {
            push_unique(&mut members, resource_id);
        }
        let removed: HashSet<TeamId> = request
            .all_team_ids
            .into_iter()
            .filter(|id| *id != first.id)
            .collect();

        for resource in ResourceRepository::list(&self.store).await? {
            let Some(current) = resource.team_id.clone() else {
                continue;
            };
            let stays = members.contains(&resource.id);
            if !stays && current == first.id {
                let mut resource = resource;
                resource.team_id = None;
                ResourceRepository::upsert(&self.store, resource).await?;
            } else if stays && current != first.id && !removed.contains(&current) {
                if let Some(mut other) = TeamRepository::get(&self.store, &current).await? {
                    other.assigned_resources.retain(|id| *id != resource.id);
                    TeamRepository::upsert(&self.store, other).await?;
                }
            }
        }

        for team_id in &removed {
            self.remove_team(team_id).await?;
        }

        for resource_id in &members {
            if let Some(mut resource) = ResourceRepository::get(&self.store, resource_id).await? {
                resource.team_id = Some(first.id.clone());
                ResourceRepository::upsert(&self.store, resource).await?;
            }
        }

        for team_id in &callout.team_ids {
            if *team_id == first.id || removed.contains(team_id) {
                continue;
            }
            if let Some(mut detached) = TeamRepository::get(&self.store, team_id).await? {
                detached.callout_id = None;
                TeamRepository::upsert(&self.store, detached).await?;
            }
        }

        first.assigned_resources = members;
        first.callout_id = Some(callout_id.clone());
        callout.team_ids = vec![first.id.clone()];

        TeamRepository::upsert(&self.store, first.clone()).await?;
        CalloutRepository::upsert(&self.store, callout.clone()).await?;
        info!(
            callout_id = %callout_id,
            team_id = %first.id,
            members = first.assigned_resources.len(),
            removed = removed.len(),
            "Teams merged"
        );

        let joiner = self.joiner().await?;
        Ok(MergeOutcome {
            callout: joiner.callout(callout),
            team: joiner.team(first),
        })
    }
}
