//! Cache Entry Module
//!
//! Defines the structure for individual in-memory cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, opaque to the cache
    pub value: V,
    /// Instant from which the entry is logically absent
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` after `now`.
    ///
    /// A non-positive TTL yields an entry that is already expired. A TTL too
    /// large to represent saturates to the latest representable instant.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds
    /// * `now` - The instant the entry is written
    pub fn new(value: V, ttl_seconds: i64, now: DateTime<Utc>) -> Self {
        let expires_at = if ttl_seconds <= 0 {
            now
        } else {
            Duration::try_seconds(ttl_seconds)
                .and_then(|ttl| now.checked_add_signed(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        };

        Self {
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired when `now` is greater than or
    /// equal to the expiration instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
