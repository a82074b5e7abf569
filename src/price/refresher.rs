//! Background price refresh loop

use super::{PriceCache, PriceSnapshot, PriceSource};
use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest accepted tick period
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a single refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetch succeeded and the cache now holds this snapshot
    Updated(PriceSnapshot),
    /// Fetch failed; the cache was left untouched
    Skipped { consecutive_failures: u32 },
}

/// Periodically fetches the price and stores it in the cache
///
/// Failures keep the last good value and wait for the next regular tick.
/// There is no retry, backoff or circuit breaker.
pub struct Refresher {
    source: Arc<dyn PriceSource>,
    cache: Arc<PriceCache>,
    interval: Duration,
    failure_warn_threshold: u32,
    consecutive_failures: u32,
}

impl Refresher {
    /// Create a refresher ticking every `interval`
    ///
    /// Intervals below `MIN_REFRESH_INTERVAL` are raised to it.
    pub fn new(source: Arc<dyn PriceSource>, cache: Arc<PriceCache>, interval: Duration) -> Self {
        Self {
            source,
            cache,
            interval: interval.max(MIN_REFRESH_INTERVAL),
            failure_warn_threshold: u32::MAX,
            consecutive_failures: 0,
        }
    }

    /// Log failures at error level once this many happen in a row
    pub fn failure_warn_threshold(mut self, threshold: u32) -> Self {
        self.failure_warn_threshold = threshold.max(1);
        self
    }

    /// Spawn the loop onto the runtime
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Tick until `shutdown` is cancelled
    ///
    /// The first tick fires one interval after start; the cache is expected
    /// to be seeded already.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs_f64(), "Price refresher started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
            }
        }

        tracing::info!("Price refresher stopped");
    }

    /// Run one fetch-then-maybe-update cycle
    pub async fn refresh_once(&mut self) -> RefreshOutcome {
        let started = Instant::now();
        let result = self.source.fetch_current().await;
        telemetry::record_latency(LatencyMetric::PriceFetch, started.elapsed());

        match result {
            Ok(value) => {
                let previous = self.cache.get();
                let snapshot = PriceSnapshot::fetched(value, next_timestamp(&previous, Utc::now()));
                self.cache.set(snapshot);

                if self.consecutive_failures > 0 {
                    tracing::info!(
                        failures = self.consecutive_failures,
                        "Price refresh recovered"
                    );
                }
                self.consecutive_failures = 0;

                telemetry::increment(CounterMetric::RefreshSuccess);
                telemetry::set_gauge(GaugeMetric::ConsecutiveRefreshFailures, 0.0);
                telemetry::set_gauge(GaugeMetric::CurrentPrice, decimal_to_f64(value));
                tracing::info!(price = %value, "Price updated");

                RefreshOutcome::Updated(snapshot)
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let stale_for = Utc::now() - self.cache.get().fetched_at;

                telemetry::increment(CounterMetric::RefreshFailure);
                telemetry::set_gauge(
                    GaugeMetric::ConsecutiveRefreshFailures,
                    f64::from(self.consecutive_failures),
                );

                if self.consecutive_failures >= self.failure_warn_threshold {
                    tracing::error!(
                        error = %e,
                        failures = self.consecutive_failures,
                        stale_secs = stale_for.num_seconds(),
                        "Price refresh keeps failing, serving stale price"
                    );
                } else {
                    tracing::warn!(
                        error = %e,
                        failures = self.consecutive_failures,
                        "Price refresh failed, keeping last price"
                    );
                }

                RefreshOutcome::Skipped {
                    consecutive_failures: self.consecutive_failures,
                }
            }
        }
    }
}

/// Timestamp for a new snapshot, strictly after the previous valid one
///
/// The wall clock can step backwards or repeat between two fetches.
fn next_timestamp(previous: &PriceSnapshot, now: DateTime<Utc>) -> DateTime<Utc> {
    if previous.valid && now <= previous.fetched_at {
        previous.fetched_at + chrono::Duration::nanoseconds(1)
    } else {
        now
    }
}

fn decimal_to_f64(value: rust_decimal::Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}
