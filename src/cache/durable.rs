//! Durable Cache Module
//!
//! Backend that keeps nothing locally: every `get`/`set` becomes a point read
//! or an upsert against a [`RecordStore`]. Expiry is checked on read against
//! the record's `expiresAt`, independently of the store's own expiry sweep.
//!
//! Read-after-write is only as strong as the store. A single Redis node gives
//! it; a replicated or eventually consistent store may serve an older record
//! shortly after a `set` resolves.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::stats::StatsRecorder;
use crate::cache::{validate_key, Cache, CacheStats};
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::store::{CacheRecord, RecordStore, StoreError};

/// Settings for a [`DurableCache`].
#[derive(Debug, Clone)]
pub struct DurableCacheConfig {
    /// Logical table / namespace holding the records. Must not contain `:`,
    /// which separates the table from the cache key in the store.
    pub table: String,
    /// Provenance tag written on every record
    pub source: String,
    /// Upper bound on each store round trip
    pub op_timeout: Duration,
}

impl Default for DurableCacheConfig {
    fn default() -> Self {
        Self {
            table: "places_cache".to_string(),
            source: "google-places".to_string(),
            op_timeout: Duration::from_millis(500),
        }
    }
}

// == Durable Cache ==
/// Cache backend over an external record store.
///
/// Not generic over the value type: one instance serves any
/// `Serialize + DeserializeOwned` value, stored as a JSON payload.
#[derive(Debug)]
pub struct DurableCache<S> {
    store: S,
    config: DurableCacheConfig,
    clock: Arc<dyn Clock>,
    stats: StatsRecorder,
}

impl<S: RecordStore> DurableCache<S> {
    // == Constructor ==
    /// Creates a durable cache over `store` driven by the wall clock.
    pub fn new(store: S, config: DurableCacheConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Creates a durable cache over `store` driven by `clock`.
    pub fn with_clock(store: S, config: DurableCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
            stats: StatsRecorder::default(),
        }
    }

    /// Runs one store call under the operation timeout, counting failures.
    async fn store_call<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = std::result::Result<T, StoreError>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(self.config.op_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                self.stats.record_error();
                warn!("durable cache {} failed: {}", op, e);
                Err(e.into())
            }
            Err(_) => {
                self.stats.record_error();
                warn!(
                    "durable cache {} timed out after {:?}",
                    op, self.config.op_timeout
                );
                Err(CacheError::Timeout(self.config.op_timeout))
            }
        }
    }
}

#[async_trait]
impl<S, V> Cache<V> for DurableCache<S>
where
    S: RecordStore,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // == Get ==
    /// Point read; a record at or past its `expiresAt` is a miss even if the
    /// store still holds it.
    async fn get(&self, key: &str) -> Result<Option<V>> {
        validate_key(key)?;

        let record = self
            .store_call("get", self.store.get_record(&self.config.table, key))
            .await?;

        let Some(record) = record else {
            self.stats.record_miss();
            debug!("durable cache miss: {}", key);
            return Ok(None);
        };

        let now = self.clock.now().timestamp();
        if record.expires_at <= now {
            self.stats.record_expired();
            debug!(
                "durable cache record expired: {} (expiresAt={}, now={})",
                key, record.expires_at, now
            );
            return Ok(None);
        }

        let value = serde_json::from_str(&record.payload).map_err(|e| {
            self.stats.record_error();
            CacheError::Malformed {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        self.stats.record_hit();
        debug!("durable cache hit: {} (source={})", key, record.source);
        Ok(Some(value))
    }

    // == Set ==
    /// Unconditional upsert with `expiresAt = now + ttl_seconds`.
    ///
    /// A non-positive TTL writes a record that is already expired, which
    /// shadows any previous value.
    ///
    /// `expiresAt` has whole-second precision: `now` is truncated, so a
    /// record can expire up to one second before `now + ttl_seconds`.
    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()> {
        validate_key(key)?;

        let payload = serde_json::to_string(&value)?;
        let expires_at = self
            .clock
            .now()
            .timestamp()
            .saturating_add(ttl_seconds.max(0));

        let record = CacheRecord {
            cache_key: key.to_string(),
            payload,
            expires_at,
            source: self.config.source.clone(),
        };

        self.store_call("set", self.store.put_record(&self.config.table, &record))
            .await?;

        self.stats.record_write();
        debug!("durable cache set: {} (expiresAt={})", key, expires_at);
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
