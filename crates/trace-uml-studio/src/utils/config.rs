//! Configuration and constants for the CLI.
//!
//! Constants cover the defaults; an optional TOML file (`UmlConfig`) can
//! override diagram and Jaeger settings. CLI flags win over both.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default timeout for Jaeger API requests
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Default Jaeger query endpoint
pub const DEFAULT_JAEGER_URL: &str = "http://localhost:16686";

/// Default lookback window passed to the Jaeger API
pub const DEFAULT_LOOKBACK: &str = "24h";

/// Default number of traces fetched from the Jaeger API
pub const DEFAULT_TRACE_LIMIT: usize = 100;
pub const MAX_TRACE_LIMIT: usize = 10_000;

/// Default directory for generated diagrams
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Operations listed per interface before the rest are summarised
pub const DEFAULT_MAX_INTERFACE_OPERATIONS: usize = 10;

/// Current topology report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Service name used when a span's process cannot be resolved
pub const UNKNOWN_SERVICE: &str = "unknown";

// Tag keys consulted by node inference, grouped by platform
pub const POD_NAME_KEYS: &[&str] = &["pod.name", "k8s.pod.name"];
pub const CONTAINER_NAME_KEY: &str = "container.name";
pub const CONTAINER_ID_KEY: &str = "container.id";
pub const HOST_KEYS: &[&str] = &["hostname", "instance.id", "host.name", "node.name"];
pub const HOST_IP_KEY: &str = "host.ip";
pub const NAMESPACE_KEYS: &[&str] = &["namespace", "k8s.namespace"];

/// Length of the short container id used in node names
pub const CONTAINER_ID_SHORT_LEN: usize = 12;

/// Complete configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct UmlConfig {
    /// Diagram rendering options
    #[serde(default)]
    pub diagram: DiagramConfig,

    /// Jaeger query API options
    #[serde(default)]
    pub jaeger: JaegerConfig,
}

/// Diagram rendering options
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DiagramConfig {
    /// Optional title printed at the top of every diagram
    pub title: Option<String>,

    /// Maximum operations listed on a component interface
    pub max_interface_operations: usize,

    /// Annotate sequence messages with span durations
    pub show_durations: bool,

    /// Annotate components with detected stereotypes
    pub show_stereotypes: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            title: None,
            max_interface_operations: DEFAULT_MAX_INTERFACE_OPERATIONS,
            show_durations: true,
            show_stereotypes: true,
        }
    }
}

impl DiagramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_max_interface_operations(mut self, max: usize) -> Self {
        self.max_interface_operations = max;
        self
    }
}

/// Jaeger query API options
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct JaegerConfig {
    pub url: String,
    pub service: Option<String>,
    pub operation: Option<String>,
    pub limit: usize,
    pub lookback: String,
    pub timeout_secs: u64,
}

impl Default for JaegerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_JAEGER_URL.to_string(),
            service: None,
            operation: None,
            limit: DEFAULT_TRACE_LIMIT,
            lookback: DEFAULT_LOOKBACK.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT.as_secs(),
        }
    }
}

impl JaegerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load configuration from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
/// * `ConfigError::Invalid` - If a value is out of range
///
/// # Example
/// ```ignore
/// let config = load_config("trace-uml.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<UmlConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: UmlConfig = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &UmlConfig) -> Result<(), ConfigError> {
    if config.jaeger.limit == 0 || config.jaeger.limit > MAX_TRACE_LIMIT {
        return Err(ConfigError::Invalid(format!(
            "jaeger.limit must be between 1 and {}",
            MAX_TRACE_LIMIT
        )));
    }

    if config.jaeger.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "jaeger.timeout_secs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
