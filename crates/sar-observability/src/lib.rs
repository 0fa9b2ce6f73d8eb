//! Logging and Prometheus metrics for SAR services.

use metrics_exporter_prometheus::PrometheusBuilder;
use sar_config::ServiceConfig;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Counter incremented once per assignment-engine operation.
pub const ENGINE_OPERATIONS: &str = "sar_engine_operations_total";

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
    pub metrics_addr: Option<String>,
}

impl From<&ServiceConfig> for ObservabilityConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            environment: config.environment.to_string(),
            log_level: config.log_level.clone(),
            metrics_addr: config.metrics_addr.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityHandle {
    pub service_name: String,
    pub environment: String,
    pub metrics_addr: Option<SocketAddr>,
}

impl ObservabilityHandle {
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_addr.is_some()
    }
}

/// Installs the global subscriber and, when an address is configured, the
/// Prometheus listener. Safe to call more than once; later calls keep the
/// first subscriber.
pub fn init(config: &ObservabilityConfig) -> ObservabilityHandle {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.log_level))
        .with_target(true)
        .try_init();

    let metrics_addr = metrics_listener(config).filter(|addr| install_exporter(config, *addr));

    ObservabilityHandle {
        service_name: config.service_name.clone(),
        environment: config.environment.clone(),
        metrics_addr,
    }
}

pub fn log_startup(handle: &ObservabilityHandle) {
    tracing::info!(
        service = %handle.service_name,
        environment = %handle.environment,
        metrics_enabled = handle.metrics_enabled(),
        "SAR service starting"
    );
}

/// Counts one engine operation, labelled with its name and outcome.
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(ENGINE_OPERATIONS, "operation" => operation, "outcome" => outcome)
        .increment(1);
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn metrics_listener(config: &ObservabilityConfig) -> Option<SocketAddr> {
    let raw = config.metrics_addr.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(addr) => Some(addr),
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                value = raw,
                error = %err,
                "Ignoring invalid SAR_METRICS_ADDR"
            );
            None
        }
    }
}

fn install_exporter(config: &ObservabilityConfig, addr: SocketAddr) -> bool {
    let installed = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", config.service_name.clone())
        .add_global_label("environment", config.environment.clone())
        .install();
    if let Err(err) = installed {
        tracing::warn!(%addr, error = %err, "Prometheus exporter not started");
        return false;
    }
    metrics::describe_counter!(
        ENGINE_OPERATIONS,
        "Assignment engine operations by name and outcome"
    );
    true
}
