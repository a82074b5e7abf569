//! Shared price cache

use super::PriceSnapshot;
use parking_lot::RwLock;

/// Holds the single current price snapshot
///
/// The lock only ever guards a copy of a small `Copy` struct; fetches
/// happen outside it.
#[derive(Debug, Default)]
pub struct PriceCache {
    current: RwLock<PriceSnapshot>,
}

impl PriceCache {
    /// Create a cache holding the invalid placeholder snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache seeded with an initial snapshot
    pub fn with_snapshot(snapshot: PriceSnapshot) -> Self {
        Self {
            current: RwLock::new(snapshot),
        }
    }

    /// Copy of the most recently stored snapshot
    pub fn get(&self) -> PriceSnapshot {
        *self.current.read()
    }

    /// Replace the current snapshot
    pub fn set(&self, snapshot: PriceSnapshot) {
        *self.current.write() = snapshot;
    }
}
