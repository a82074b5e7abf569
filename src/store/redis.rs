//! Redis-backed registration store
//!
//! Each registration is a JSON document at `{prefix}:{id}`; the set at
//! `{prefix}` indexes the registered ids.

use super::{DeviceRegistration, DeviceStore, StoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;

/// Registration store backed by a Redis connection manager
#[derive(Clone)]
pub struct RedisDeviceStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisDeviceStore {
    /// Connect and verify the server answers PING
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let mut connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut connection)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(url = %redact(url), "Connected to Redis");

        Ok(Self {
            connection,
            key_prefix: key_prefix.into(),
        })
    }

    fn document_key(&self, id: &str) -> String {
        document_key(&self.key_prefix, id)
    }
}

fn document_key(prefix: &str, id: &str) -> String {
    format!("{}:{}", prefix, id)
}

/// Strip credentials from a connection URL before logging it
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[async_trait]
impl DeviceStore for RedisDeviceStore {
    async fn insert(&self, registration: &DeviceRegistration) -> Result<(), StoreError> {
        let payload = serde_json::to_string(registration)?;
        let mut conn = self.connection.clone();

        redis::pipe()
            .atomic()
            .set(self.document_key(&registration.id), payload)
            .ignore()
            .sadd(&self.key_prefix, &registration.id)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        Ok(())
    }
}
