//! Price types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Point-in-time view of the cached price
///
/// Snapshots are plain values: readers get their own copy and writers
/// replace the whole snapshot, never individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Quoted price, serialized as a decimal string
    pub value: Decimal,
    /// When the value was fetched
    pub fetched_at: DateTime<Utc>,
    /// False only before the first successful fetch
    pub valid: bool,
}

impl PriceSnapshot {
    /// Placeholder held before the seed fetch completes
    pub fn empty() -> Self {
        Self {
            value: Decimal::ZERO,
            fetched_at: DateTime::<Utc>::default(),
            valid: false,
        }
    }

    /// Snapshot for a successfully fetched value
    pub fn fetched(value: Decimal, fetched_at: DateTime<Utc>) -> Self {
        Self {
            value,
            fetched_at,
            valid: true,
        }
    }
}

impl Default for PriceSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// A single fetch from the price provider failed
///
/// Transport, status and parse failures share one kind: the refresher
/// skips the cycle whatever the cause.
#[derive(Debug, Error)]
#[error("price fetch failed: {0}")]
pub struct SourceError(String);

impl SourceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::new(format!("request timed out: {e}"))
        } else {
            Self::new(e.to_string())
        }
    }
}
