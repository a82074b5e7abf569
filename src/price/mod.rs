//! Price module
//!
//! Keeps the latest BTC spot price in memory:
//! - `PriceSource` fetches a quote from an external provider
//! - `PriceCache` holds the current snapshot behind a lock
//! - `Refresher` replaces the snapshot on a fixed interval
//! - `QueryService` is the read-only view handed to request handlers

mod cache;
mod coinbase;
mod query;
mod refresher;
mod types;

pub use cache::PriceCache;
pub use coinbase::{CoinbaseConfig, CoinbaseSource, COINBASE_API_URL};
pub use query::QueryService;
pub use refresher::{RefreshOutcome, Refresher, MIN_REFRESH_INTERVAL};
pub use types::{PriceSnapshot, SourceError};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for spot price providers
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price
    async fn fetch_current(&self) -> Result<Decimal, SourceError>;
}
