//! Redis-backed [`RecordStore`].
//!
//! Each record is a hash at `{table}:{cacheKey}` with the fields `cacheKey`,
//! `payload`, `expiresAt` and `source`. Writes also set `EXPIREAT expiresAt`
//! so Redis drops dead records on its own.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{CacheRecord, RecordStore, StoreError};

const FIELD_CACHE_KEY: &str = "cacheKey";
const FIELD_PAYLOAD: &str = "payload";
const FIELD_EXPIRES_AT: &str = "expiresAt";
const FIELD_SOURCE: &str = "source";

/// Record store over a single Redis endpoint.
///
/// Cloning is cheap: clones share the same auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis instance at `url`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid Redis URL: {e}")))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis connection error: {e}")))?;
        Ok(Self { manager })
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

/// Build the full Redis key for a record.
///
/// Cache keys may contain `:`; table names may not, which keeps the prefix
/// unambiguous (`Config::from_env` rejects such tables).
fn record_key(table: &str, cache_key: &str) -> String {
    format!("{table}:{cache_key}")
}

/// Rebuild a record from an `HGETALL` reply. An empty reply means no record.
fn record_from_fields(
    cache_key: &str,
    mut fields: HashMap<String, String>,
) -> Result<Option<CacheRecord>, StoreError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let mut take = |name: &str| {
        fields
            .remove(name)
            .ok_or_else(|| StoreError::Malformed(format!("record {cache_key} has no {name}")))
    };

    let payload = take(FIELD_PAYLOAD)?;
    let source = take(FIELD_SOURCE)?;
    let expires_at = take(FIELD_EXPIRES_AT)?
        .parse::<i64>()
        .map_err(|e| StoreError::Malformed(format!("record {cache_key} has bad expiresAt: {e}")))?;

    Ok(Some(CacheRecord {
        cache_key: cache_key.to_string(),
        payload,
        expires_at,
        source,
    }))
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn get_record(
        &self,
        table: &str,
        cache_key: &str,
    ) -> Result<Option<CacheRecord>, StoreError> {
        let mut con = self.manager.clone();
        let fields: HashMap<String, String> = con
            .hgetall(record_key(table, cache_key))
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis HGETALL error: {e}")))?;

        record_from_fields(cache_key, fields)
    }

    async fn put_record(&self, table: &str, record: &CacheRecord) -> Result<(), StoreError> {
        let mut con = self.manager.clone();
        let key = record_key(table, &record.cache_key);
        let expires_at = record.expires_at.to_string();

        redis::pipe()
            .atomic()
            .hset_multiple(
                &key,
                &[
                    (FIELD_CACHE_KEY, record.cache_key.as_str()),
                    (FIELD_PAYLOAD, record.payload.as_str()),
                    (FIELD_EXPIRES_AT, expires_at.as_str()),
                    (FIELD_SOURCE, record.source.as_str()),
                ],
            )
            .ignore()
            .expire_at(&key, record.expires_at)
            .ignore()
            .query_async::<()>(&mut con)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis write error: {e}")))
    }
}
