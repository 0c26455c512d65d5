//! Places Cache - TTL caching in front of a places API
//!
//! One cache contract ([`Cache`]) with two interchangeable backends: a
//! process-local [`MemoryCache`] and a Redis-backed [`DurableCache`]. The
//! backend is picked once at startup from [`Config`].

pub mod backend;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod places;
pub mod store;
pub mod tasks;

pub use backend::Backend;
pub use cache::{Cache, CacheStats, DurableCache, DurableCacheConfig, MemoryCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BackendKind, Config};
pub use error::CacheError;
pub use store::{CacheRecord, RecordStore, RedisStore, StoreError};
pub use tasks::spawn_cleanup_task;
