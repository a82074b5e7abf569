//! Read-only price access for request handlers

use super::{PriceCache, PriceSnapshot};
use std::sync::Arc;

/// Read-only view over the shared price cache
#[derive(Debug, Clone)]
pub struct QueryService {
    cache: Arc<PriceCache>,
}

impl QueryService {
    pub fn new(cache: Arc<PriceCache>) -> Self {
        Self { cache }
    }

    /// Latest snapshot known to the cache; never waits on I/O
    pub fn current_price(&self) -> PriceSnapshot {
        self.cache.get()
    }
}
