use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

/// A cache entry together with its expiration deadline, if any.
#[derive(Debug, Clone)]
pub(super) struct CacheEntry {
    pub(super) data: CacheData,
    pub(super) deadline: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub(super) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }
}

pub struct InMemoryCacheStore {
    pub(super) entries: RwLock<HashMap<String, CacheEntry>>,
}

pub(super) struct RedisCacheStore {
    pub(super) client: ::redis::Client,
}

/// Key-value store with per-key expiration, shared across request tasks.
///
/// Handles are constructed explicitly (see [`connect_cache_store`]) and
/// passed by `Arc` into their consumers; there is no process-global store.
///
/// [`connect_cache_store`]: super::connect_cache_store
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Verify the store is reachable. Called once at construction and by
    /// health checks.
    async fn init(&self) -> Result<(), StorageError>;

    /// Put a value into the store with a TTL in seconds.
    async fn put_with_ttl(
        &self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Get a value from the store. Expired or missing keys yield `None`.
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a value from the store. Removing an absent key is not an error.
    async fn remove(&self, prefix: &str, key: &str) -> Result<(), StorageError>;
}
