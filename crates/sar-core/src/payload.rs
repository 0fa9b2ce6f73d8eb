//! Request and response bodies shared by the API service and the dashboard.

use crate::domain::{
    CalloutStatus, ResourceDetails, ResourceStatus, ResourceType, TeamType,
};
use crate::ids::{CalloutId, ResourceId, TeamId};
use crate::view::{CalloutView, ResourceView, TeamView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResourceStatus>,
    #[serde(flatten)]
    pub details: ResourceDetails,
}

/// Field patch for a resource. Team membership is not patchable here; it only
/// changes through team assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResourceStatus>,
    #[serde(flatten)]
    pub details: ResourceDetails,
}

impl ResourceDetails {
    /// Overwrites every field that `patch` sets.
    pub fn merge(&mut self, patch: ResourceDetails) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        fn take_list(slot: &mut Vec<String>, value: Vec<String>) {
            if !value.is_empty() {
                *slot = value;
            }
        }

        take(&mut self.callsign, patch.callsign);
        take(&mut self.contact, patch.contact);
        take_list(&mut self.skills, patch.skills);
        take_list(&mut self.qualifications, patch.qualifications);
        take(&mut self.dog_name, patch.dog_name);
        take(&mut self.vehicle_type, patch.vehicle_type);
        take(&mut self.capacity, patch.capacity);
        take(&mut self.fuel_level, patch.fuel_level);
        take_list(&mut self.capabilities, patch.capabilities);
        take_list(&mut self.equipment, patch.equipment);
        take(&mut self.location, patch.location);
        take_list(&mut self.contents, patch.contents);
        take(&mut self.condition, patch.condition);
        take(&mut self.last_maintenance, patch.last_maintenance);
        take(&mut self.expiry, patch.expiry);
        take(&mut self.certification_level, patch.certification_level);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCallout {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_reference: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_commander: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CalloutStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_commander: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CalloutStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TeamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callout_id: Option<CalloutId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_reference: Option<String>,
}

impl NewTeam {
    pub fn new(name: impl Into<String>, kind: TeamType) -> Self {
        Self {
            name: name.into(),
            kind,
            callout_id: None,
            vehicle_id: None,
            color: None,
            location: None,
            grid_reference: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTeam {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub team_id: TeamId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeTeams {
    pub first_team_id: TeamId,
    #[serde(default)]
    pub resource_ids: Vec<ResourceId>,
    #[serde(default)]
    pub all_team_ids: Vec<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutAssignment {
    pub callout: CalloutView,
    pub resource: ResourceView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team: TeamView,
    pub resource: ResourceView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callout: Option<CalloutView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutTeamLink {
    pub callout: CalloutView,
    pub team: TeamView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub callout: CalloutView,
    pub team: TeamView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_overwrites_present_fields() {
        let mut details = ResourceDetails {
            callsign: Some("A1".to_string()),
            skills: vec!["Rope".to_string()],
            ..ResourceDetails::default()
        };
        details.merge(ResourceDetails {
            contact: Some("07700 900000".to_string()),
            ..ResourceDetails::default()
        });
        assert_eq!(details.callsign.as_deref(), Some("A1"));
        assert_eq!(details.contact.as_deref(), Some("07700 900000"));
        assert_eq!(details.skills, vec!["Rope".to_string()]);
    }

    #[test]
    fn new_resource_reads_flat_body() {
        let body = serde_json::json!({
            "name": "Alice",
            "type": "Personnel",
            "callsign": "A1"
        });
        let request: NewResource = serde_json::from_value(body).unwrap();
        assert_eq!(request.kind, ResourceType::Personnel);
        assert_eq!(request.status, None);
        assert_eq!(request.details.callsign.as_deref(), Some("A1"));
    }
}
