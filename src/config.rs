//! Configuration types for coin-alert

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub price: PriceConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Per-request deadline (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory served under /resources/
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_resources_dir() -> PathBuf {
    PathBuf::from("resources")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            resources_dir: default_resources_dir(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Price provider and refresh configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceConfig {
    /// Base URL of the spot price provider
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Currency pair to quote (e.g., "BTC-USD")
    #[serde(default = "default_currency_pair")]
    pub currency_pair: String,

    /// Interval between background refreshes (seconds)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// HTTP timeout for a single fetch (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Consecutive refresh failures before failures are logged as errors
    #[serde(default = "default_failure_warn_threshold")]
    pub failure_warn_threshold: u32,
}

fn default_provider_url() -> String {
    "https://api.coinbase.com".to_string()
}
fn default_currency_pair() -> String {
    "BTC-USD".to_string()
}
fn default_refresh_interval_secs() -> u64 {
    5
}
fn default_failure_warn_threshold() -> u32 {
    12 // one minute of failures at the default interval
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            currency_pair: default_currency_pair(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            failure_warn_threshold: default_failure_warn_threshold(),
        }
    }
}

impl PriceConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Device registration store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Redis connection URL
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Key namespace for registration documents
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_store_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
fn default_key_prefix() -> String {
    "coinalert:devices".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, returning `None` only when the file does not exist
    ///
    /// Unreadable, malformed or invalid files are errors.
    pub fn load_optional(path: impl AsRef<std::path::Path>) -> anyhow::Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.price.refresh_interval_secs == 0 {
            anyhow::bail!("price.refresh_interval_secs must be greater than zero");
        }
        if self.price.currency_pair.trim().is_empty() {
            anyhow::bail!("price.currency_pair must not be empty");
        }
        Ok(())
    }
}
