use std::sync::Arc;

use crate::storage::errors::StorageError;

use super::types::{CacheStore, InMemoryCacheStore, RedisCacheStore};

/// Construct a cache store handle and verify it is reachable.
///
/// `store_type` is `"memory"` or `"redis"`; `store_url` is the connection
/// URL for the Redis backend and ignored by the in-memory one. The returned
/// handle is meant to be passed into its consumers (e.g. the session
/// manager) at startup; open it once and share it.
pub async fn connect_cache_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn CacheStore>, StorageError> {
    tracing::info!(store_type, "Initializing cache store");

    let store: Arc<dyn CacheStore> = match store_type {
        "memory" => Arc::new(InMemoryCacheStore::new()),
        "redis" => {
            let client = redis::Client::open(store_url)?;
            Arc::new(RedisCacheStore { client })
        }
        t => {
            return Err(StorageError::Storage(format!(
                "Unsupported cache store type: {t}. Supported types are 'memory' and 'redis'"
            )));
        }
    };

    store.init().await?;
    tracing::info!(store_type, "Connected to cache store");

    Ok(store)
}
