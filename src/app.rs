//! Service startup and shutdown
//!
//! Startup order: store connection, price source, seed fetch, refresher,
//! HTTP listener. Any failure before the listener is serving is fatal.

use crate::api::{self, AppState};
use crate::config::{Config, PriceConfig, StoreConfig};
use crate::price::{
    CoinbaseConfig, CoinbaseSource, PriceCache, PriceSnapshot, PriceSource, QueryService,
    Refresher, SourceError,
};
use crate::store::{DeviceStore, RedisDeviceStore, StoreError};
use chrono::Utc;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Errors that prevent the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration values the service cannot run with
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Registration store unreachable
    #[error("store connection failed: {0}")]
    Store(#[from] StoreError),
    /// HTTP client for the price provider could not be built
    #[error("price client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    /// Mandatory first fetch failed
    #[error("seed price fetch failed: {0}")]
    SeedFetch(#[source] SourceError),
    /// Listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Connect the Redis registration store
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn DeviceStore>, StartupError> {
    let store = RedisDeviceStore::connect(&config.url, config.key_prefix.clone()).await?;
    Ok(Arc::new(store))
}

/// Build the configured price source
pub fn price_source(config: &PriceConfig) -> Result<Arc<dyn PriceSource>, StartupError> {
    let source = CoinbaseSource::new(CoinbaseConfig::from(config))?;
    Ok(Arc::new(source))
}

/// Fetch once and build a cache holding the result
pub async fn seed_cache(source: &dyn PriceSource) -> Result<PriceCache, StartupError> {
    let value = source
        .fetch_current()
        .await
        .map_err(StartupError::SeedFetch)?;

    tracing::info!(price = %value, "Initial price fetched");
    Ok(PriceCache::with_snapshot(PriceSnapshot::fetched(
        value,
        Utc::now(),
    )))
}

/// A started service: seeded cache, running refresher and HTTP server
pub struct App {
    local_addr: SocketAddr,
    query: QueryService,
    shutdown: CancellationToken,
    refresher: JoinHandle<()>,
    server: JoinHandle<io::Result<()>>,
}

impl App {
    /// Seed the cache, start the refresher and begin serving
    pub async fn start(
        config: &Config,
        source: Arc<dyn PriceSource>,
        store: Arc<dyn DeviceStore>,
    ) -> Result<Self, StartupError> {
        config
            .validate()
            .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

        let cache = Arc::new(seed_cache(source.as_ref()).await?);
        let query = QueryService::new(Arc::clone(&cache));
        let shutdown = CancellationToken::new();

        let addr = config.server.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { addr, source })?;

        let refresher = Refresher::new(source, cache, config.price.refresh_interval())
            .failure_warn_threshold(config.price.failure_warn_threshold)
            .spawn(shutdown.clone());

        let router = api::router(AppState::new(query.clone(), store), &config.server);
        let server_shutdown = shutdown.clone();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
        });

        tracing::info!(addr = %local_addr, "HTTP server listening");

        Ok(Self {
            local_addr,
            query,
            shutdown,
            refresher,
            server,
        })
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Read access to the cached price
    pub fn query(&self) -> &QueryService {
        &self.query
    }

    /// Token that stops the refresher and the server when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve until Ctrl-C or the shutdown token fires, then stop cleanly
    pub async fn run_until_shutdown(self) -> anyhow::Result<()> {
        let token = self.shutdown.clone();
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Received shutdown signal");
            }
            _ = token.cancelled() => {}
        }
        self.shutdown().await
    }

    /// Cancel the refresher and the server and wait for both to finish
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.shutdown.cancel();

        self.refresher.await?;
        self.server.await??;

        tracing::info!("Shutdown complete");
        Ok(())
    }
}
