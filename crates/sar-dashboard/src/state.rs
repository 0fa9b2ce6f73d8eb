use sar_config::DashboardConfig;
use sar_core::{
    deploy_teams_and_resources, now_epoch_millis, CalloutId, CalloutView, Deployment,
    EpochMillis, ResourceStatus, ResourceType, ResourceView, TeamId, TeamView,
};

use crate::api::ApiClient;
use crate::banner::{Banner, BannerKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Callouts,
    Teams,
}

/// Resource pool filter. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFilter {
    pub kind: Option<ResourceType>,
    pub status: Option<ResourceStatus>,
    /// Team name.
    pub team: Option<String>,
}

impl ResourceFilter {
    pub fn matches(&self, view: &ResourceView) -> bool {
        self.kind.is_none_or(|kind| view.resource.kind == kind)
            && self.status.is_none_or(|status| view.resource.status == status)
            && self
                .team
                .as_deref()
                .is_none_or(|team| view.team.as_deref() == Some(team))
    }
}

#[derive(Debug, Clone)]
struct CachedDeployment {
    generation: u64,
    deployment: Deployment,
}

/// Client-side mirror of the server's resources, callouts and teams.
///
/// Handlers (see `handlers.rs`) call the API first and only touch the mirror
/// once every call has succeeded, so a failed handler leaves it unchanged.
pub struct Dashboard {
    pub(crate) api: ApiClient,
    pub(crate) config: DashboardConfig,
    resources: Vec<ResourceView>,
    callouts: Vec<CalloutView>,
    teams: Vec<TeamView>,
    pub filter: ResourceFilter,
    pub view_mode: ViewMode,
    pub(crate) loading: bool,
    pub(crate) deploying: bool,
    banner: Option<Banner>,
    generation: u64,
    deployment: Option<CachedDeployment>,
}

impl Dashboard {
    pub fn new(api: ApiClient, config: DashboardConfig) -> Self {
        Self {
            api,
            config,
            resources: Vec::new(),
            callouts: Vec::new(),
            teams: Vec::new(),
            filter: ResourceFilter::default(),
            view_mode: ViewMode::default(),
            loading: true,
            deploying: false,
            banner: None,
            generation: 0,
            deployment: None,
        }
    }

    pub fn resources(&self) -> &[ResourceView] {
        &self.resources
    }

    pub fn callouts(&self) -> &[CalloutView] {
        &self.callouts
    }

    pub fn teams(&self) -> &[TeamView] {
        &self.teams
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn deploying(&self) -> bool {
        self.deploying
    }

    /// Bumped on every change to the mirrored collections.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner_at(now_epoch_millis())
    }

    pub fn banner_at(&self, now: EpochMillis) -> Option<&Banner> {
        self.banner.as_ref().filter(|banner| banner.is_visible(now))
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Resources offered in the pool. In the teams view only resources that
    /// are not on a team yet are listed.
    pub fn available_resources(&self) -> Vec<&ResourceView> {
        self.resources
            .iter()
            .filter(|view| self.filter.matches(view))
            .filter(|view| self.view_mode != ViewMode::Teams || view.resource.team_id.is_none())
            .collect()
    }

    pub fn team_resources(&self, team_id: &TeamId) -> Vec<&ResourceView> {
        self.resources
            .iter()
            .filter(|view| view.resource.team_id.as_ref() == Some(team_id))
            .collect()
    }

    pub fn callout(&self, callout_id: &CalloutId) -> Option<&CalloutView> {
        self.callouts
            .iter()
            .find(|view| view.callout.id == *callout_id)
    }

    /// Deployment state of the mirror, recomputed only after it changed.
    pub fn deployment(&mut self) -> &Deployment {
        let generation = self.generation;
        if self
            .deployment
            .as_ref()
            .is_some_and(|cached| cached.generation != generation)
        {
            self.deployment = None;
        }
        let (callouts, teams, resources) = (&self.callouts, &self.teams, &self.resources);
        &self
            .deployment
            .get_or_insert_with(|| CachedDeployment {
                generation,
                deployment: deploy_teams_and_resources(callouts, teams, resources),
            })
            .deployment
    }

    pub(crate) fn notify(&mut self, kind: BannerKind, message: impl Into<String>) {
        let ttl_ms = match kind {
            BannerKind::Success => self.config.success_banner_ms,
            BannerKind::Error => self.config.error_banner_ms,
        };
        self.banner = Some(Banner::new(kind, message, now_epoch_millis(), ttl_ms));
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn set_resources(&mut self, resources: Vec<ResourceView>) {
        self.resources = resources;
        self.touch();
    }

    pub(crate) fn set_callouts(&mut self, callouts: Vec<CalloutView>) {
        self.callouts = callouts;
        self.touch();
    }

    pub(crate) fn set_teams(&mut self, teams: Vec<TeamView>) {
        self.teams = teams;
        self.touch();
    }

    pub(crate) fn push_resource(&mut self, resource: ResourceView) {
        self.resources.push(resource);
        self.touch();
    }

    pub(crate) fn push_callout(&mut self, callout: CalloutView) {
        self.callouts.push(callout);
        self.touch();
    }

    pub(crate) fn replace_resource(&mut self, resource: ResourceView) {
        if let Some(slot) = self
            .resources
            .iter_mut()
            .find(|view| view.resource.id == resource.resource.id)
        {
            *slot = resource;
        } else {
            self.resources.push(resource);
        }
        self.touch();
    }

    pub(crate) fn replace_callout(&mut self, callout: CalloutView) {
        if let Some(slot) = self
            .callouts
            .iter_mut()
            .find(|view| view.callout.id == callout.callout.id)
        {
            *slot = callout;
        } else {
            self.callouts.push(callout);
        }
        self.touch();
    }

    /// Replaces a team in the team list and wherever a callout embeds it.
    pub(crate) fn replace_team(&mut self, team: TeamView) {
        for callout in &mut self.callouts {
            for slot in callout
                .teams
                .iter_mut()
                .filter(|view| view.team.id == team.team.id)
            {
                *slot = team.clone();
            }
        }
        if let Some(slot) = self
            .teams
            .iter_mut()
            .find(|view| view.team.id == team.team.id)
        {
            *slot = team;
        } else {
            self.teams.push(team);
        }
        self.touch();
    }

    pub(crate) fn add_team_to_callout(&mut self, callout_id: &CalloutId, team: TeamView) {
        if let Some(callout) = self
            .callouts
            .iter_mut()
            .find(|view| view.callout.id == *callout_id)
        {
            if !callout.callout.team_ids.contains(&team.team.id) {
                callout.callout.team_ids.push(team.team.id.clone());
                callout.teams.push(team.clone());
            }
        }
        self.replace_team(team);
    }

    pub(crate) fn remove_team(&mut self, team_id: &TeamId) {
        for callout in &mut self.callouts {
            callout.callout.team_ids.retain(|id| id != team_id);
            callout.teams.retain(|view| view.team.id != *team_id);
        }
        self.teams.retain(|view| view.team.id != *team_id);
        self.touch();
    }

    /// Rewrites the joined team name on every member after a rename.
    pub(crate) fn rename_members(&mut self, team_id: &TeamId, name: &str) {
        for view in &mut self.resources {
            if view.resource.team_id.as_ref() == Some(team_id) {
                view.team = Some(name.to_string());
            }
        }
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sar_core::{Resource, ResourceDetails, ResourceId};

    fn view(id: &str, kind: ResourceType, team: Option<(&str, &str)>) -> ResourceView {
        ResourceView {
            resource: Resource {
                id: ResourceId::from(id),
                name: id.to_string(),
                kind,
                status: ResourceStatus::Available,
                team_id: team.map(|(id, _)| TeamId::from(id)),
                details: ResourceDetails::default(),
            },
            team: team.map(|(_, name)| name.to_string()),
        }
    }

    fn dashboard() -> Dashboard {
        let api = ApiClient::new("http://127.0.0.1:9").expect("valid url");
        Dashboard::new(api, DashboardConfig::default())
    }

    #[test]
    fn pool_hides_teamed_resources_in_teams_view() {
        let mut dashboard = dashboard();
        dashboard.set_resources(vec![
            view("a", ResourceType::Personnel, None),
            view("b", ResourceType::Personnel, Some(("t1", "Alpha"))),
            view("c", ResourceType::Vehicles, None),
        ]);

        assert_eq!(dashboard.available_resources().len(), 3);

        dashboard.view_mode = ViewMode::Teams;
        let ids: Vec<&str> = dashboard
            .available_resources()
            .iter()
            .map(|view| view.resource.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);

        dashboard.filter.kind = Some(ResourceType::Vehicles);
        assert_eq!(dashboard.available_resources().len(), 1);
    }

    #[test]
    fn team_resources_match_by_id() {
        let mut dashboard = dashboard();
        dashboard.set_resources(vec![
            view("a", ResourceType::Personnel, Some(("t1", "Alpha"))),
            view("b", ResourceType::Personnel, Some(("t2", "Alpha"))),
        ]);

        let members = dashboard.team_resources(&TeamId::from("t1"));
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].resource.id.as_str(), "a");
    }

    #[test]
    fn deployment_is_recomputed_only_after_changes() {
        let mut dashboard = dashboard();
        dashboard.set_resources(vec![view("a", ResourceType::Personnel, None)]);

        let first = dashboard.generation();
        assert_eq!(dashboard.deployment().resources.len(), 1);
        assert_eq!(dashboard.generation(), first);

        dashboard.push_resource(view("b", ResourceType::Personnel, None));
        assert!(dashboard.generation() > first);
        assert_eq!(dashboard.deployment().resources.len(), 2);
    }

    #[test]
    fn filter_matches_team_name() {
        let filter = ResourceFilter {
            team: Some("Alpha".to_string()),
            ..ResourceFilter::default()
        };
        assert!(filter.matches(&view("a", ResourceType::Personnel, Some(("t1", "Alpha")))));
        assert!(!filter.matches(&view("b", ResourceType::Personnel, None)));
    }
}
