//! Coinbase spot price source
//!
//! Queries the public Coinbase spot endpoint, which needs no API key:
//! `GET /v2/prices/{pair}/spot` returning
//! `{"data":{"amount":"30000.00","base":"BTC","currency":"USD"}}`.

use super::{PriceSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Coinbase API base URL
pub const COINBASE_API_URL: &str = "https://api.coinbase.com";

/// Configuration for the Coinbase source
#[derive(Debug, Clone)]
pub struct CoinbaseConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Currency pair (e.g., "BTC-USD")
    pub currency_pair: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CoinbaseConfig {
    fn default() -> Self {
        Self {
            base_url: COINBASE_API_URL.to_string(),
            currency_pair: "BTC-USD".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::PriceConfig> for CoinbaseConfig {
    fn from(config: &crate::config::PriceConfig) -> Self {
        Self {
            base_url: config.provider_url.trim_end_matches('/').to_string(),
            currency_pair: config.currency_pair.to_uppercase(),
            timeout: config.request_timeout(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotPrice,
}

#[derive(Debug, Deserialize)]
struct SpotPrice {
    amount: String,
    #[allow(dead_code)]
    base: Option<String>,
    #[allow(dead_code)]
    currency: Option<String>,
}

/// Spot price source backed by the Coinbase public API
pub struct CoinbaseSource {
    config: CoinbaseConfig,
    client: Client,
}

impl CoinbaseSource {
    /// Create a source; fails only if the HTTP client cannot be built
    pub fn new(config: CoinbaseConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("coin-alert/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    /// Build the spot endpoint URL for the configured pair
    fn spot_url(&self) -> String {
        format!(
            "{}/v2/prices/{}/spot",
            self.config.base_url, self.config.currency_pair
        )
    }

    /// Parse a spot response body into a price
    fn parse_spot(body: &str) -> Result<Decimal, SourceError> {
        let response: SpotResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::new(format!("invalid response body: {e}")))?;

        let amount = Decimal::from_str(response.data.amount.trim()).map_err(|e| {
            SourceError::new(format!("invalid amount {:?}: {e}", response.data.amount))
        })?;

        if amount.is_sign_negative() {
            return Err(SourceError::new(format!("negative amount {amount}")));
        }

        Ok(amount)
    }
}

#[async_trait]
impl PriceSource for CoinbaseSource {
    async fn fetch_current(&self) -> Result<Decimal, SourceError> {
        let url = self.spot_url();

        tracing::debug!(url = %url, "Fetching spot price");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::new(format!(
                "provider returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.text().await?;
        Self::parse_spot(&body)
    }
}
