use crate::ids::{CalloutId, ResourceId, TeamId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Personnel,
    Vehicles,
    Equipment,
    #[serde(rename = "Medical Packs")]
    MedicalPacks,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personnel => "Personnel",
            Self::Vehicles => "Vehicles",
            Self::Equipment => "Equipment",
            Self::MedicalPacks => "Medical Packs",
        }
    }

    /// Kit that is marked in use while it sits in a team.
    pub fn is_kit(&self) -> bool {
        matches!(self, Self::Equipment | Self::MedicalPacks)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "personnel" => Ok(Self::Personnel),
            "vehicles" | "vehicle" => Ok(Self::Vehicles),
            "equipment" => Ok(Self::Equipment),
            "medicalpacks" | "medicalpack" => Ok(Self::MedicalPacks),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    Available,
    #[serde(rename = "In Use", alias = "in use")]
    InUse,
    #[serde(rename = "On Call")]
    OnCall,
    Maintenance,
    Deployed,
}

impl Default for ResourceStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::InUse => "In Use",
            Self::OnCall => "On Call",
            Self::Maintenance => "Maintenance",
            Self::Deployed => "Deployed",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "available" => Ok(Self::Available),
            "inuse" => Ok(Self::InUse),
            "oncall" => Ok(Self::OnCall),
            "maintenance" => Ok(Self::Maintenance),
            "deployed" => Ok(Self::Deployed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamType {
    Vehicle,
    Hill,
    Personnel,
    Equipment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamStatus {
    Available,
    Deployed,
}

impl Default for TeamStatus {
    fn default() -> Self {
        Self::Available
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalloutStatus {
    Active,
    Closed,
}

impl Default for CalloutStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Type-specific resource attributes. Which of them are populated depends on
/// the resource type; none of them take part in assignment rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(flatten)]
    pub details: ResourceDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TeamType,
    pub color: String,
    #[serde(default)]
    pub callout_id: Option<CalloutId>,
    #[serde(default)]
    pub vehicle_id: Option<ResourceId>,
    #[serde(default)]
    pub assigned_resources: Vec<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_reference: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callout {
    pub id: CalloutId,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub grid_reference: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub incident_commander: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub status: CalloutStatus,
    #[serde(default)]
    pub assigned_resources: Vec<ResourceId>,
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
    pub created_at: Timestamp,
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
