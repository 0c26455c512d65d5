//! Cache-aside place lookup
//!
//! Reads the cache before calling the origin and writes fresh origin results
//! back. The cache is advisory: any cache failure is logged and the lookup
//! falls through to the origin.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use super::origin::{Origin, OriginError};
use crate::cache::{Cache, MAX_KEY_LENGTH};

// == Lookup Error ==
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Origin(#[from] OriginError),
}

/// Cache key for a place-details request.
pub fn details_key(place_id: &str) -> String {
    bounded_key("place", place_id.trim())
}

/// Cache key for a text search; case and spacing differences share a key.
pub fn search_key(query: &str) -> String {
    let normalized = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    bounded_key("search", &normalized)
}

/// `{prefix}:{body}`, or `{prefix}:h:{sha256 hex of body}` when that would
/// exceed [`MAX_KEY_LENGTH`]. The digest keeps long inputs cacheable and is
/// stable across processes, which durable records need.
fn bounded_key(prefix: &str, body: &str) -> String {
    let key = format!("{prefix}:{body}");
    if key.len() <= MAX_KEY_LENGTH {
        return key;
    }
    let digest = Sha256::digest(body.as_bytes());
    format!("{prefix}:h:{}", hex::encode(digest))
}

/// Place lookups fronted by a cache.
pub struct PlacesLookup<O> {
    cache: Arc<dyn Cache<Value>>,
    origin: O,
    ttl_seconds: i64,
}

impl<O: Origin> PlacesLookup<O> {
    pub fn new(cache: Arc<dyn Cache<Value>>, origin: O, ttl_seconds: i64) -> Self {
        Self {
            cache,
            origin,
            ttl_seconds,
        }
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }

    // == Place Details ==
    pub async fn place_details(&self, place_id: &str) -> Result<Value, LookupError> {
        if place_id.trim().is_empty() {
            return Err(LookupError::InvalidInput("place id cannot be empty".to_string()));
        }

        self.cached_or_fetch(&details_key(place_id), || {
            self.origin.place_details(place_id.trim())
        })
        .await
    }

    // == Text Search ==
    pub async fn text_search(&self, query: &str) -> Result<Value, LookupError> {
        if query.trim().is_empty() {
            return Err(LookupError::InvalidInput("query cannot be empty".to_string()));
        }

        self.cached_or_fetch(&search_key(query), || self.origin.text_search(query.trim()))
            .await
    }

    async fn cached_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Value, LookupError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, OriginError>>,
    {
        match self.cache.get(key).await {
            Ok(Some(value)) => {
                debug!("lookup served from cache: {}", key);
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) => warn!("cache read failed for {}, using origin: {}", key, e),
        }

        let fresh = fetch().await?;

        if let Err(e) = self.cache.set(key, fresh.clone(), self.ttl_seconds).await {
            warn!("cache write failed for {}: {}", key, e);
        }

        Ok(fresh)
    }
}
