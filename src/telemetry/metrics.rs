//! Prometheus metrics

use std::net::SocketAddr;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Round trip to the price provider
    PriceFetch,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Refresh cycle stored a new price
    RefreshSuccess,
    /// Refresh cycle kept the previous price
    RefreshFailure,
    /// Registration written to the store
    RegistrationStored,
    /// Registration payload rejected
    RegistrationRejected,
    /// Store write failed
    RegistrationFailed,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Last cached price
    CurrentPrice,
    /// Refresh failures since the last success
    ConsecutiveRefreshFailures,
}

/// Start the Prometheus exporter listening on `addr`
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(addr = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::PriceFetch => "coinalert_price_fetch_latency_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Increment a counter
pub fn increment(metric: CounterMetric) {
    match metric {
        CounterMetric::RefreshSuccess => {
            metrics::counter!("coinalert_price_refresh_total", "outcome" => "success").increment(1)
        }
        CounterMetric::RefreshFailure => {
            metrics::counter!("coinalert_price_refresh_total", "outcome" => "failure").increment(1)
        }
        CounterMetric::RegistrationStored => {
            metrics::counter!("coinalert_registrations_total", "outcome" => "stored").increment(1)
        }
        CounterMetric::RegistrationRejected => {
            metrics::counter!("coinalert_registrations_total", "outcome" => "rejected")
                .increment(1)
        }
        CounterMetric::RegistrationFailed => {
            metrics::counter!("coinalert_registrations_total", "outcome" => "failed").increment(1)
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::CurrentPrice => "coinalert_current_price",
        GaugeMetric::ConsecutiveRefreshFailures => "coinalert_consecutive_refresh_failures",
    };

    metrics::gauge!(metric_name).set(value);
}
