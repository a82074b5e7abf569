//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use self::metrics::{
    increment, init_metrics, record_latency, set_gauge, CounterMetric, GaugeMetric,
    LatencyMetric,
};
pub use crate::config::LogFormat;
pub use logging::init_logging;

use crate::config::TelemetryConfig;
use std::net::SocketAddr;

/// Initialize logging and, when a port is configured, the metrics exporter
///
/// Must run inside the tokio runtime when `metrics_port` is set.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(SocketAddr::from(([0, 0, 0, 0], port)))?;
    }

    Ok(())
}
