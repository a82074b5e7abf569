//! Serve command implementation

use crate::app::{self, App};
use crate::config::Config;
use crate::store::{DeviceStore, MemoryDeviceStore};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Keep registrations in memory instead of Redis
    #[arg(long)]
    pub memory_store: bool,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store: Arc<dyn DeviceStore> = if self.memory_store {
            tracing::warn!("Using in-memory registration store, registrations will not persist");
            Arc::new(MemoryDeviceStore::new())
        } else {
            app::connect_store(&config.store).await?
        };

        let source = app::price_source(&config.price)?;
        let app = App::start(config, source, store).await?;

        app.run_until_shutdown().await
    }
}
