//! Cache Module
//!
//! The cache port and its two backends: a process-local map and a durable
//! record store.

mod durable;
mod entry;
mod memory;
mod port;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use durable::{DurableCache, DurableCacheConfig};
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use port::{validate_key, Cache};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
