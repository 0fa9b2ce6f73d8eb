//! Client-side state for the SAR resource dashboard.
//!
//! `Dashboard` mirrors the server's collections through `ApiClient` and
//! exposes one handler per board action. Handlers report their outcome as a
//! short-lived `Banner`.

pub mod api;
pub mod banner;
mod handlers;
pub mod state;


pub use api::{ApiClient, ApiError, StatusResponse};
pub use banner::{Banner, BannerKind};
pub use state::{Dashboard, ResourceFilter, ViewMode};
