//! Expired Entry Sweeper
//!
//! Background task that periodically purges expired in-memory entries.
//! Reads already hide expired entries; this only bounds memory held by keys
//! that are written once and never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between runs. Abort the returned handle to stop it.
///
/// # Arguments
/// * `cache` - Shared reference to the in-memory cache
/// * `cleanup_interval_secs` - Interval in seconds between purges
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::<serde_json::Value>::new());
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(
    cache: Arc<MemoryCache<V>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expired-entry sweeper with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("Sweeper: removed {} expired entries", removed);
            } else {
                debug!("Sweeper: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::clock::ManualClock;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = Arc::new(MemoryCache::<String>::with_clock(clock.clone()));

        cache
            .set("expire_soon", "value".to_string(), 1)
            .await
            .unwrap();
        clock.advance(Duration::from_secs(2));

        let handle = spawn_cleanup_task(cache.clone(), 1);

        // Let the first purge run without reading the key
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.len().await, 0, "Expired entry should have been purged");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = Arc::new(MemoryCache::<String>::new());

        cache
            .set("long_lived", "value".to_string(), 3600)
            .await
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            cache.get("long_lived").await.unwrap(),
            Some("value".to_string()),
            "Valid entry should not be removed"
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache: Arc<MemoryCache<String>> = Arc::new(MemoryCache::new());

        let handle = spawn_cleanup_task(cache, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
