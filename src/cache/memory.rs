//! In-Memory Cache Module
//!
//! Process-local backend: a HashMap of key to [`CacheEntry`] behind one
//! `RwLock` per instance. Expiry is enforced at read time; expired entries are
//! removed lazily by the read that finds them, or by the optional sweeper.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::stats::StatsRecorder;
use crate::cache::{validate_key, Cache, CacheEntry, CacheStats};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

// == Memory Cache ==
/// In-memory TTL cache with no capacity bound.
#[derive(Debug)]
pub struct MemoryCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Source of "now" for expiry checks
    clock: Arc<dyn Clock>,
    /// Outcome counters
    stats: StatsRecorder,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            stats: StatsRecorder::default(),
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of physically stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<V> Default for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Get ==
    /// Returns the value if present and unexpired.
    ///
    /// The fast path only takes the read lock. An expired entry is removed
    /// under the write lock, re-checked first because a concurrent `set` may
    /// have replaced it in between.
    async fn get(&self, key: &str) -> Result<Option<V>> {
        validate_key(key)?;
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => {
                    self.stats.record_miss();
                    debug!("memory cache miss: {}", key);
                    return Ok(None);
                }
                Some(entry) if !entry.is_expired_at(now) => {
                    self.stats.record_hit();
                    debug!("memory cache hit: {}", key);
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                Ok(Some(entry.value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                self.stats.record_expired();
                debug!("memory cache entry expired: {}", key);
                Ok(None)
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Set ==
    /// Stores `value`, replacing any existing entry regardless of its state.
    ///
    /// A non-positive TTL removes the existing entry and stores nothing.
    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()> {
        validate_key(key)?;
        let now = self.clock.now();

        let mut entries = self.entries.write().await;
        if ttl_seconds <= 0 {
            entries.remove(key);
            debug!(
                "memory cache set with non-positive ttl {} for {}, entry dropped",
                ttl_seconds, key
            );
        } else {
            entries.insert(key.to_string(), CacheEntry::new(value, ttl_seconds, now));
        }
        self.stats.record_write();

        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
