//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error: it is `Ok(None)` from [`Cache::get`](crate::cache::Cache::get).

use std::time::Duration;

use thiserror::Error;

use crate::store::StoreError;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or exceeds the maximum length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The backing store failed or could not be reached
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The backing store did not answer within the operation timeout
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// A stored payload could not be decoded into the requested type
    #[error("Malformed payload for key {key}: {message}")]
    Malformed { key: String, message: String },

    /// The value could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    // == Backend Failure ==
    /// Returns true when the error comes from the backend being unavailable,
    /// slow or returning garbage, as opposed to a caller mistake.
    ///
    /// Callers that treat the cache as advisory use this to decide whether to
    /// fall through to the origin.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            CacheError::Store(_) | CacheError::Timeout(_) | CacheError::Malformed { .. }
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
