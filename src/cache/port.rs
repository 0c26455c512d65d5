//! Cache Port
//!
//! The contract shared by every backend. Callers hold an `Arc<dyn Cache<V>>`
//! and never learn which backend is behind it.

use async_trait::async_trait;

use crate::cache::{CacheStats, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};

/// A TTL cache keyed by opaque strings, generic over the stored value.
///
/// Implementations must uphold:
/// - `get` returns `Ok(None)` for a key that was never written, or whose
///   expiry instant is at or before now, even if the entry still exists
///   physically.
/// - `set` replaces whatever is stored under `key` (last writer wins) and
///   installs a fresh expiry of now + `ttl_seconds`.
/// - `ttl_seconds <= 0` is accepted and treated as already expired: the call
///   invalidates any previous value and the next `get` returns `Ok(None)`.
/// - Backend failures surface as `Err`, never as a miss.
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Returns the value stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<V>>;

    /// Stores `value` under `key` for `ttl_seconds`.
    async fn set(&self, key: &str, value: V, ttl_seconds: i64) -> Result<()>;

    /// Returns a snapshot of this instance's counters.
    fn stats(&self) -> CacheStats;
}

// == Key Validation ==
/// Rejects empty keys and keys longer than [`MAX_KEY_LENGTH`] bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
