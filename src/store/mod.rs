//! Device registration store
//!
//! Registrations are written once and never read back by the service.

mod memory;
mod redis;

pub use self::redis::RedisDeviceStore;
pub use memory::MemoryDeviceStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A device registered for future price notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    /// Device token supplied by the client
    pub id: String,
    /// When the registration was accepted
    pub registered_at: DateTime<Utc>,
    /// Free-form client metadata
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store
    #[error("store connection failed: {0}")]
    Connection(String),
    /// The insert itself failed
    #[error("store write failed: {0}")]
    Write(String),
    /// The registration could not be encoded
    #[error("registration encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Trait for registration sinks
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Persist a registration
    async fn insert(&self, registration: &DeviceRegistration) -> Result<(), StoreError>;
}
