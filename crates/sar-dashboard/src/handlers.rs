use sar_core::{
    check_new_callout, check_new_resource, deploy_teams_and_resources, CalloutId, CalloutPatch,
    CalloutView, MergeTeams, NewCallout, NewResource, NewTeam, RenameTeam, ResourceId,
    ResourceView, TeamId, TeamView,
};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::banner::BannerKind;
use crate::state::{Dashboard, ViewMode};

/// Which mirrored collections a handler re-fetches after its call.
#[derive(Debug, Clone, Copy)]
struct Refresh {
    resources: bool,
    callouts: bool,
    teams: bool,
}

impl Refresh {
    const ALL: Self = Self {
        resources: true,
        callouts: true,
        teams: true,
    };
    const RESOURCES: Self = Self {
        resources: true,
        callouts: false,
        teams: false,
    };
    const TEAMS: Self = Self {
        resources: false,
        callouts: false,
        teams: true,
    };
}

#[derive(Debug, Default)]
struct Fetched {
    resources: Option<Vec<ResourceView>>,
    callouts: Option<Vec<CalloutView>>,
    teams: Option<Vec<TeamView>>,
}

impl Dashboard {
    async fn fetch(&self, refresh: Refresh) -> Result<Fetched, ApiError> {
        let mut fetched = Fetched::default();
        if refresh.resources {
            fetched.resources = Some(self.api.fetch_resources().await?);
        }
        if refresh.callouts {
            fetched.callouts = Some(self.api.fetch_callouts().await?);
        }
        if refresh.teams {
            fetched.teams = Some(self.api.fetch_teams().await?);
        }
        Ok(fetched)
    }

    fn apply(&mut self, fetched: Fetched) {
        if let Some(resources) = fetched.resources {
            self.set_resources(resources);
        }
        if let Some(callouts) = fetched.callouts {
            self.set_callouts(callouts);
        }
        if let Some(teams) = fetched.teams {
            self.set_teams(teams);
        }
    }

    /// Raises the banner for a finished handler and hands the result back.
    fn settle<T>(
        &mut self,
        result: Result<T, ApiError>,
        success: impl Into<String>,
        failure: &str,
    ) -> Result<T, ApiError> {
        match &result {
            Ok(_) => self.notify(BannerKind::Success, success),
            Err(err) => {
                warn!(error = %err, "{failure}");
                self.notify(BannerKind::Error, failure);
            }
        }
        result
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.fetch(Refresh::ALL).await;
        self.loading = false;
        match result {
            Ok(fetched) => {
                self.apply(fetched);
                info!(
                    resources = self.resources().len(),
                    callouts = self.callouts().len(),
                    teams = self.teams().len(),
                    "Dashboard loaded"
                );
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Dashboard load failed");
                self.notify(
                    BannerKind::Error,
                    "Failed to load data. Make sure the backend server is running.",
                );
                Err(err)
            }
        }
    }

    pub async fn assign_to_callout(
        &mut self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self
            .api
            .assign_resource(callout_id, resource_id)
            .await
            .map(|assignment| {
                self.replace_callout(assignment.callout);
                self.replace_resource(assignment.resource);
            });
        self.settle(result, "Resource assigned successfully", "Failed to assign resource")
    }

    pub async fn remove_from_callout(
        &mut self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self
            .api
            .unassign_resource(callout_id, resource_id)
            .await
            .map(|assignment| {
                self.replace_callout(assignment.callout);
                self.replace_resource(assignment.resource);
            });
        self.settle(result, "Resource unassigned successfully", "Failed to remove resource")
    }

    /// Drops a resource onto a team board. Membership of the team it left
    /// changes too, so the whole mirror is re-fetched.
    pub async fn assign_to_team(
        &mut self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self.assign_to_team_and_fetch(team_id, resource_id).await;
        let success = match &result {
            Ok((name, _)) => format!("{name} assigned to team"),
            Err(_) => String::new(),
        };
        let result = result.map(|(_, fetched)| self.apply(fetched));
        self.settle(result, success, "Failed to assign to team")
    }

    async fn assign_to_team_and_fetch(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<(String, Fetched), ApiError> {
        let assignment = self.api.assign_to_team(team_id, resource_id).await?;
        let fetched = self.fetch(Refresh::ALL).await?;
        Ok((assignment.resource.resource.name, fetched))
    }

    pub async fn remove_from_team(
        &mut self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self
            .api
            .unassign_from_team(team_id, resource_id)
            .await
            .map(|assignment| {
                self.replace_team(assignment.team);
                self.replace_resource(assignment.resource);
            });
        self.settle(result, "Resource removed from team", "Failed to remove from team")
    }

    /// Runs the form checks before anything is sent.
    pub async fn create_resource(&mut self, request: NewResource) -> Result<(), ApiError> {
        if let Some(problem) = check_new_resource(&request).into_iter().next() {
            self.notify(BannerKind::Error, problem.message);
            return Err(ApiError::new(problem.message));
        }
        let result = self
            .api
            .create_resource(&request)
            .await
            .map(|resource| self.push_resource(resource));
        self.settle(result, "Resource added successfully", "Failed to create resource")
    }

    pub async fn create_callout(&mut self, request: NewCallout) -> Result<(), ApiError> {
        if let Some(problem) = check_new_callout(&request).into_iter().next() {
            self.notify(BannerKind::Error, problem.message);
            return Err(ApiError::new(problem.message));
        }
        let result = self.api.create_callout(&request).await.map(|callout| {
            self.push_callout(callout);
            self.view_mode = ViewMode::Callouts;
        });
        self.settle(result, "Callout created successfully", "Failed to create callout")
    }

    pub async fn create_team_in_callout(
        &mut self,
        callout_id: &CalloutId,
        request: NewTeam,
    ) -> Result<(), ApiError> {
        let success = format!("{} created successfully", request.name.trim());
        let result = self.create_team_in_callout_and_fetch(callout_id, &request).await;
        let result = result.map(|(team, fetched)| {
            self.add_team_to_callout(callout_id, team);
            self.apply(fetched);
        });
        self.settle(result, success, "Failed to create team")
    }

    async fn create_team_in_callout_and_fetch(
        &self,
        callout_id: &CalloutId,
        request: &NewTeam,
    ) -> Result<(TeamView, Fetched), ApiError> {
        let team = self.api.create_team_in_callout(callout_id, request).await?;
        // A vehicle team claims its vehicle on the server.
        let fetched = if request.vehicle_id.is_some() {
            self.fetch(Refresh::RESOURCES).await?
        } else {
            Fetched::default()
        };
        Ok((team, fetched))
    }

    pub async fn delete_team_from_callout(
        &mut self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> Result<(), ApiError> {
        let result = self.delete_team_from_callout_and_fetch(callout_id, team_id).await;
        let result = result.map(|fetched| {
            self.remove_team(team_id);
            self.apply(fetched);
        });
        self.settle(result, "Team deleted successfully", "Failed to delete team")
    }

    async fn delete_team_from_callout_and_fetch(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> Result<Fetched, ApiError> {
        self.api.delete_team_from_callout(callout_id, team_id).await?;
        self.fetch(Refresh::RESOURCES).await
    }

    pub async fn assign_to_team_in_callout(
        &mut self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self
            .assign_to_team_in_callout_and_fetch(callout_id, team_id, resource_id)
            .await
            .map(|fetched| self.apply(fetched));
        self.settle(
            result,
            "Resource assigned to team successfully",
            "Failed to assign to team",
        )
    }

    async fn assign_to_team_in_callout_and_fetch(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<Fetched, ApiError> {
        self.api
            .assign_to_team_in_callout(callout_id, team_id, resource_id)
            .await?;
        self.fetch(Refresh::ALL).await
    }

    pub async fn unassign_from_team_in_callout(
        &mut self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self
            .api
            .unassign_from_team_in_callout(callout_id, team_id, resource_id)
            .await
            .map(|assignment| {
                if let Some(callout) = assignment.callout {
                    self.replace_callout(callout);
                }
                self.replace_team(assignment.team);
                self.replace_resource(assignment.resource);
            });
        self.settle(
            result,
            "Resource removed from team successfully",
            "Failed to remove from team",
        )
    }

    /// Re-fetches everything and tags members of deployed teams `In Use`.
    pub async fn deploy_all(&mut self) -> Result<(), ApiError> {
        self.deploying = true;
        let result = self.fetch(Refresh::ALL).await.map(|fetched| {
            let callouts = fetched.callouts.unwrap_or_default();
            let teams = fetched.teams.unwrap_or_default();
            let mut resources = fetched.resources.unwrap_or_default();
            let deployment = deploy_teams_and_resources(&callouts, &teams, &resources);
            for (view, deployed) in resources.iter_mut().zip(deployment.resources) {
                view.resource = deployed;
            }
            self.set_callouts(callouts);
            self.set_teams(deployment.teams);
            self.set_resources(resources);
        });
        self.deploying = false;
        self.settle(
            result,
            "All teams and resources deployed!",
            "Failed to deploy teams/resources",
        )
    }

    pub async fn delete_team(&mut self, team_id: &TeamId) -> Result<(), ApiError> {
        let result = self
            .delete_team_and_fetch(team_id)
            .await
            .map(|fetched| self.apply(fetched));
        self.settle(result, "Team deleted successfully", "Failed to delete team")
    }

    async fn delete_team_and_fetch(&self, team_id: &TeamId) -> Result<Fetched, ApiError> {
        self.api.delete_team(team_id).await?;
        self.fetch(Refresh::ALL).await
    }

    /// One server call cascades the delete; the mirror is then rebuilt.
    pub async fn delete_callout(&mut self, callout_id: &CalloutId) -> Result<(), ApiError> {
        let result = self
            .delete_callout_and_fetch(callout_id)
            .await
            .map(|fetched| self.apply(fetched));
        self.settle(result, "Callout deleted successfully", "Failed to delete callout")
    }

    async fn delete_callout_and_fetch(&self, callout_id: &CalloutId) -> Result<Fetched, ApiError> {
        self.api.delete_callout(callout_id).await?;
        self.fetch(Refresh::ALL).await
    }

    pub async fn rename_team(
        &mut self,
        team_id: &TeamId,
        request: RenameTeam,
    ) -> Result<(), ApiError> {
        let result = self.api.rename_team(team_id, &request).await.map(|team| {
            let name = team.team.name.clone();
            self.replace_team(team);
            self.rename_members(team_id, &name);
        });
        self.settle(result, "Team updated", "Failed to update team")
    }

    pub async fn merge_teams(
        &mut self,
        callout_id: &CalloutId,
        request: MergeTeams,
    ) -> Result<(), ApiError> {
        let result = self
            .merge_teams_and_fetch(callout_id, &request)
            .await
            .map(|fetched| self.apply(fetched));
        self.settle(result, "Teams merged successfully", "Failed to merge teams")
    }

    async fn merge_teams_and_fetch(
        &self,
        callout_id: &CalloutId,
        request: &MergeTeams,
    ) -> Result<Fetched, ApiError> {
        self.api.merge_teams(callout_id, request).await?;
        self.fetch(Refresh::ALL).await
    }

    /// Commits a vehicle to the callout if it is not already, then puts it on
    /// one of the callout's teams.
    pub async fn assign_vehicle_to_callout_team(
        &mut self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        vehicle_id: &ResourceId,
    ) -> Result<(), ApiError> {
        let result = self
            .assign_vehicle_and_fetch(callout_id, team_id, vehicle_id)
            .await
            .map(|fetched| self.apply(fetched));
        self.settle(
            result,
            "Vehicle assigned to callout/team",
            "Failed to assign vehicle to callout/team",
        )
    }

    async fn assign_vehicle_and_fetch(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        vehicle_id: &ResourceId,
    ) -> Result<Fetched, ApiError> {
        let committed = self
            .callout(callout_id)
            .is_some_and(|view| view.callout.assigned_resources.contains(vehicle_id));
        if !committed {
            self.api.assign_resource(callout_id, vehicle_id).await?;
        }
        self.api
            .assign_to_team_in_callout(callout_id, team_id, vehicle_id)
            .await?;
        self.fetch(Refresh::ALL).await
    }

    pub async fn rename_callout(
        &mut self,
        callout_id: &CalloutId,
        title: &str,
    ) -> Result<(), ApiError> {
        let patch = CalloutPatch {
            title: Some(title.to_string()),
            ..CalloutPatch::default()
        };
        let result = self
            .api
            .update_callout(callout_id, &patch)
            .await
            .map(|callout| self.replace_callout(callout));
        self.settle(result, "Callout name updated", "Failed to rename callout")
    }

    pub async fn move_resource_on_board(
        &mut self,
        resource_id: &ResourceId,
        dest_team_id: &TeamId,
    ) -> Result<(), ApiError> {
        let result = self
            .assign_to_team_and_fetch(dest_team_id, resource_id)
            .await
            .map(|(_, fetched)| self.apply(fetched));
        self.settle(result, "Resource moved successfully", "Failed to move resource")
    }

    /// Creates a team that belongs to no callout.
    pub async fn create_team(&mut self, request: NewTeam) -> Result<(), ApiError> {
        let success = format!("{} created successfully", request.name.trim());
        let result = self
            .create_team_and_fetch(&request)
            .await
            .map(|fetched| self.apply(fetched));
        self.settle(result, success, "Failed to create team")
    }

    async fn create_team_and_fetch(&self, request: &NewTeam) -> Result<Fetched, ApiError> {
        self.api.create_team(request).await?;
        let refresh = if request.vehicle_id.is_some() {
            Refresh::ALL
        } else {
            Refresh::TEAMS
        };
        self.fetch(refresh).await
    }
}
