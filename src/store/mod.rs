//! Record Store Module
//!
//! The seam between [`DurableCache`](crate::cache::DurableCache) and an
//! external key-value store. A store only reads and upserts flat records; all
//! expiry decisions stay in the cache.

mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use redis_store::RedisStore;

// == Store Error ==
/// Failures raised by a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection refused, dropped, or command rejected
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record exists but its fields are missing or unparsable
    #[error("malformed record: {0}")]
    Malformed(String),
}

// == Cache Record ==
/// One row of the durable cache table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Primary key
    pub cache_key: String,
    /// JSON-serialized value, opaque to the store
    pub payload: String,
    /// Expiry as seconds since the Unix epoch
    pub expires_at: i64,
    /// Which upstream produced the value
    pub source: String,
}

/// A network-accessible store holding [`CacheRecord`]s, one logical table per
/// namespace.
///
/// `put_record` is an unconditional upsert. Implementations should register
/// `expires_at` with the store's native expiry if it has one; reads must not
/// depend on it.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point read by primary key.
    async fn get_record(
        &self,
        table: &str,
        cache_key: &str,
    ) -> Result<Option<CacheRecord>, StoreError>;

    /// Writes `record`, replacing any existing one with the same key.
    async fn put_record(&self, table: &str, record: &CacheRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn get_record(
        &self,
        table: &str,
        cache_key: &str,
    ) -> Result<Option<CacheRecord>, StoreError> {
        (**self).get_record(table, cache_key).await
    }

    async fn put_record(&self, table: &str, record: &CacheRecord) -> Result<(), StoreError> {
        (**self).put_record(table, record).await
    }
}
