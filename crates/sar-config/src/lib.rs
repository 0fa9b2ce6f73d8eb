//! Environment-driven settings for the SAR API service and dashboard client.

use serde::{Deserialize, Serialize};
use std::{env, fmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    /// Unknown names fall back to `Local`.
    pub fn from_env(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "test" | "testing" => Self::Test,
            "staging" => Self::Staging,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for `sar-api`, read from `SAR_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: Environment,
    pub region: Option<String>,
    pub bind_addr: String,
    pub metrics_addr: Option<String>,
    pub log_level: String,
    /// JSON file with resources, callouts and teams loaded at boot.
    pub seed_file: Option<String>,
}

impl ServiceConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3001";

    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    pub fn from_lookup(
        default_service_name: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());
        let optional = |key: &str| read(key).filter(|value| !value.is_empty());

        Self {
            service_name: optional("SAR_SERVICE_NAME")
                .unwrap_or_else(|| default_service_name.to_string()),
            environment: read("SAR_ENV")
                .map(|value| Environment::from_env(&value))
                .unwrap_or_default(),
            region: optional("SAR_REGION"),
            bind_addr: optional("SAR_BIND_ADDR")
                .unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string()),
            metrics_addr: optional("SAR_METRICS_ADDR"),
            log_level: optional("SAR_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            seed_file: optional("SAR_SEED_FILE"),
        }
    }
}

/// Settings for the dashboard client: where the API lives and how long
/// banners stay up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub success_banner_ms: u64,
    pub error_banner_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3001".to_string(),
            success_banner_ms: 3000,
            error_banner_ms: 5000,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: u64| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            api_base_url: lookup("SAR_API_BASE_URL")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            success_banner_ms: millis("SAR_DASHBOARD_BANNER_MS", defaults.success_banner_ms),
            error_banner_ms: millis("SAR_DASHBOARD_ERROR_BANNER_MS", defaults.error_banner_ms),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
