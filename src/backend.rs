//! Backend Selection
//!
//! Builds exactly one cache backend from [`Config`] and hands it out as an
//! `Arc<dyn Cache<V>>`. Callers never branch on which backend they got.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{Cache, DurableCache, DurableCacheConfig, MemoryCache};
use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::store::{RecordStore, RedisStore};
use crate::tasks::spawn_cleanup_task;

/// The configured cache plus any background task that belongs to it.
pub struct Backend<V: Send + 'static> {
    cache: Arc<dyn Cache<V>>,
    /// In-memory sweeper, when enabled
    sweeper: Option<JoinHandle<()>>,
}

impl<V> Backend<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    // == From Config ==
    /// Builds the backend named by `config.backend`.
    ///
    /// The durable backend connects to Redis here; a connection failure is
    /// returned rather than silently falling back to memory.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            BackendKind::Memory => Ok(Self::memory(config.cleanup_interval)),
            BackendKind::Durable => {
                let store = RedisStore::connect(&config.redis_url).await?;
                info!(
                    "Durable cache connected to {} (table={})",
                    config.redis_url, config.table
                );
                Ok(Self::durable(store, config.durable()))
            }
        }
    }

    // == Memory ==
    /// In-memory backend; `cleanup_interval_secs == 0` disables the sweeper.
    pub fn memory(cleanup_interval_secs: u64) -> Self {
        let cache = Arc::new(MemoryCache::<V>::new());
        let sweeper = (cleanup_interval_secs > 0)
            .then(|| spawn_cleanup_task(cache.clone(), cleanup_interval_secs));

        Self { cache, sweeper }
    }

    // == Durable ==
    /// Durable backend over any record store.
    pub fn durable<S>(store: S, config: DurableCacheConfig) -> Self
    where
        S: RecordStore + 'static,
    {
        Self {
            cache: Arc::new(DurableCache::new(store, config)),
            sweeper: None,
        }
    }

    /// Cheap handle to the cache for callers.
    pub fn cache(&self) -> Arc<dyn Cache<V>> {
        self.cache.clone()
    }

    /// Stops background work owned by this backend.
    pub fn shutdown(self) {
        if let Some(handle) = self.sweeper {
            handle.abort();
        }
    }
}
