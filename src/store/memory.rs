//! In-process registration store

use super::{DeviceRegistration, DeviceStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps registrations in memory; used for local runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryDeviceStore {
    registrations: Arc<RwLock<Vec<DeviceRegistration>>>,
}

impl MemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations inserted so far, oldest first
    pub async fn registrations(&self) -> Vec<DeviceRegistration> {
        self.registrations.read().await.clone()
    }
}

#[async_trait]
impl DeviceStore for MemoryDeviceStore {
    async fn insert(&self, registration: &DeviceRegistration) -> Result<(), StoreError> {
        let mut registrations = self.registrations.write().await;
        registrations.retain(|r| r.id != registration.id);
        registrations.push(registration.clone());
        Ok(())
    }
}
