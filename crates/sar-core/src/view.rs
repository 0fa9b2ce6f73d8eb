//! Wire representations that join stored entities together.

use crate::domain::{Callout, Resource, Team, TeamStatus};
use crate::ids::CalloutId;
use serde::{Deserialize, Serialize};

/// A resource together with the name of the team it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default)]
    pub team: Option<String>,
}

/// A team tagged with its derived deployment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    #[serde(flatten)]
    pub team: Team,
    #[serde(default)]
    pub status: TeamStatus,
    #[serde(default)]
    pub deployed_to: Option<CalloutId>,
}

/// A callout with its teams embedded in `teamIds` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutView {
    #[serde(flatten)]
    pub callout: Callout,
    #[serde(default)]
    pub teams: Vec<TeamView>,
}

impl AsRef<Resource> for Resource {
    fn as_ref(&self) -> &Resource {
        self
    }
}

impl AsRef<Team> for Team {
    fn as_ref(&self) -> &Team {
        self
    }
}

impl AsRef<Callout> for Callout {
    fn as_ref(&self) -> &Callout {
        self
    }
}

impl AsRef<Resource> for ResourceView {
    fn as_ref(&self) -> &Resource {
        &self.resource
    }
}

impl AsRef<Team> for TeamView {
    fn as_ref(&self) -> &Team {
        &self.team
    }
}

impl AsRef<Callout> for CalloutView {
    fn as_ref(&self) -> &Callout {
        &self.callout
    }
}
