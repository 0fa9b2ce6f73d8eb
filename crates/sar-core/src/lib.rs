pub mod colors;
pub mod deployment;
pub mod domain;
pub mod error;
pub mod ids;
pub mod payload;
pub mod time;
pub mod validation;
pub mod view;

pub use colors::{team_color, DEFAULT_TEAM_COLOR};
pub use deployment::{deploy_teams_and_resources, Deployment, DeploymentIndex};
pub use domain::{
    Callout, CalloutStatus, Resource, ResourceDetails, ResourceStatus, ResourceType, Team,
    TeamStatus, TeamType,
};
pub use error::{ErrorCode, SarError, SarResult};
pub use ids::{CalloutId, ResourceId, TeamId};
pub use payload::{
    CalloutAssignment, CalloutPatch, CalloutTeamLink, MergeOutcome, MergeTeams, NewCallout,
    NewResource, NewTeam, RenameTeam, ResourcePatch, ResourceRef, TeamAssignment, TeamRef,
};
pub use time::{now, now_epoch_millis, EpochMillis, Timestamp};
pub use validation::{check_new_callout, check_new_resource, is_grid_reference, FieldError};
pub use view::{CalloutView, ResourceView, TeamView};
