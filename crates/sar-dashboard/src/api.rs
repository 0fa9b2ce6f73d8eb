use reqwest::{Client, Response, Url};
use sar_config::DashboardConfig;
use sar_core::{
    CalloutAssignment, CalloutId, CalloutPatch, CalloutTeamLink, CalloutView, Deployment,
    MergeOutcome, MergeTeams, NewCallout, NewResource, NewTeam, RenameTeam, ResourceId,
    ResourceRef, ResourceView, TeamAssignment, TeamId, TeamRef, TeamView,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    /// HTTP status when the server answered; `None` for transport failures.
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self {
            message: error.to_string(),
            status: error.status().map(|status| status.as_u16()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub service: String,
    pub environment: String,
    pub region: Option<String>,
    pub timestamp_ms: u64,
}

/// Typed wrapper over the SAR REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|err| ApiError::new(err.to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn status(&self) -> Result<StatusResponse, ApiError> {
        self.get("api/status").await
    }

    pub async fn fetch_resources(&self) -> Result<Vec<ResourceView>, ApiError> {
        self.get("api/resources").await
    }

    pub async fn fetch_callouts(&self) -> Result<Vec<CalloutView>, ApiError> {
        self.get("api/callouts").await
    }

    pub async fn fetch_teams(&self) -> Result<Vec<TeamView>, ApiError> {
        self.get("api/teams").await
    }

    pub async fn create_resource(&self, request: &NewResource) -> Result<ResourceView, ApiError> {
        self.post("api/resources", request).await
    }

    pub async fn create_callout(&self, request: &NewCallout) -> Result<CalloutView, ApiError> {
        self.post("api/callouts", request).await
    }

    pub async fn update_callout(
        &self,
        callout_id: &CalloutId,
        patch: &CalloutPatch,
    ) -> Result<CalloutView, ApiError> {
        self.put(&format!("api/callouts/{callout_id}"), patch).await
    }

    pub async fn delete_callout(&self, callout_id: &CalloutId) -> Result<(), ApiError> {
        self.delete(&format!("api/callouts/{callout_id}")).await
    }

    pub async fn assign_resource(
        &self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> Result<CalloutAssignment, ApiError> {
        self.post(
            &format!("api/callouts/{callout_id}/assign"),
            &resource_ref(resource_id),
        )
        .await
    }

    pub async fn unassign_resource(
        &self,
        callout_id: &CalloutId,
        resource_id: &ResourceId,
    ) -> Result<CalloutAssignment, ApiError> {
        self.post(
            &format!("api/callouts/{callout_id}/unassign"),
            &resource_ref(resource_id),
        )
        .await
    }

    pub async fn link_team(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> Result<CalloutTeamLink, ApiError> {
        let body = TeamRef {
            team_id: team_id.clone(),
        };
        self.post(&format!("api/callouts/{callout_id}/assign-team"), &body)
            .await
    }

    pub async fn unlink_team(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> Result<CalloutTeamLink, ApiError> {
        let body = TeamRef {
            team_id: team_id.clone(),
        };
        self.post(&format!("api/callouts/{callout_id}/unassign-team"), &body)
            .await
    }

    pub async fn create_team_in_callout(
        &self,
        callout_id: &CalloutId,
        request: &NewTeam,
    ) -> Result<TeamView, ApiError> {
        self.post(&format!("api/callouts/{callout_id}/teams"), request)
            .await
    }

    pub async fn delete_team_from_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
    ) -> Result<(), ApiError> {
        self.delete(&format!("api/callouts/{callout_id}/teams/{team_id}"))
            .await
    }

    pub async fn assign_to_team_in_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<TeamAssignment, ApiError> {
        self.post(
            &format!("api/callouts/{callout_id}/teams/{team_id}/assign"),
            &resource_ref(resource_id),
        )
        .await
    }

    pub async fn unassign_from_team_in_callout(
        &self,
        callout_id: &CalloutId,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<TeamAssignment, ApiError> {
        self.post(
            &format!("api/callouts/{callout_id}/teams/{team_id}/unassign"),
            &resource_ref(resource_id),
        )
        .await
    }

    pub async fn merge_teams(
        &self,
        callout_id: &CalloutId,
        request: &MergeTeams,
    ) -> Result<MergeOutcome, ApiError> {
        self.post(&format!("api/callouts/{callout_id}/merge-teams"), request)
            .await
    }

    pub async fn create_team(&self, request: &NewTeam) -> Result<TeamView, ApiError> {
        self.post("api/teams", request).await
    }

    pub async fn rename_team(
        &self,
        team_id: &TeamId,
        request: &RenameTeam,
    ) -> Result<TeamView, ApiError> {
        self.put(&format!("api/teams/{team_id}"), request).await
    }

    pub async fn delete_team(&self, team_id: &TeamId) -> Result<(), ApiError> {
        self.delete(&format!("api/teams/{team_id}")).await
    }

    pub async fn assign_to_team(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<TeamAssignment, ApiError> {
        self.post(
            &format!("api/teams/{team_id}/assign"),
            &resource_ref(resource_id),
        )
        .await
    }

    pub async fn unassign_from_team(
        &self,
        team_id: &TeamId,
        resource_id: &ResourceId,
    ) -> Result<TeamAssignment, ApiError> {
        self.post(
            &format!("api/teams/{team_id}/unassign"),
            &resource_ref(resource_id),
        )
        .await
    }

    pub async fn available_vehicles(&self) -> Result<Vec<ResourceView>, ApiError> {
        self.get("api/available-vehicles").await
    }

    pub async fn deployable_teams(&self) -> Result<Vec<TeamView>, ApiError> {
        self.get("api/deployable-teams").await
    }

    pub async fn deployment(&self) -> Result<Deployment, ApiError> {
        self.get("api/deployment").await
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)?).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)?).json(body).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.put(self.url(path)?).json(body).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.client.delete(self.url(path)?).send().await?;
        check(response).await?;
        Ok(())
    }
}

fn resource_ref(resource_id: &ResourceId) -> ResourceRef {
    ResourceRef {
        resource_id: resource_id.clone(),
    }
}

/// Passes successful responses through and turns the rest into an
/// `ApiError` carrying the server's `{error}` message when there is one.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("request failed with {status}"),
    };
    Err(ApiError::with_status(message, status.as_u16()))
}
