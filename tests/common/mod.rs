//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use places_cache::{
    Cache, CacheRecord, DurableCache, DurableCacheConfig, ManualClock, MemoryCache, RecordStore,
    StoreError,
};
use serde_json::Value;

/// In-process record store that can be switched into a failing state to
/// simulate the network going away.
#[derive(Default)]
pub struct FlakyStore {
    records: Mutex<HashMap<String, CacheRecord>>,
    down: AtomicBool,
}

impl FlakyStore {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated network failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn get_record(
        &self,
        table: &str,
        cache_key: &str,
    ) -> Result<Option<CacheRecord>, StoreError> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&format!("{table}:{cache_key}"))
            .cloned())
    }

    async fn put_record(&self, table: &str, record: &CacheRecord) -> Result<(), StoreError> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .insert(format!("{table}:{}", record.cache_key), record.clone());
        Ok(())
    }
}

/// Both backends behind the same trait object, each with its own manual clock.
pub fn both_backends() -> Vec<(&'static str, Arc<dyn Cache<Value>>, Arc<ManualClock>)> {
    let memory_clock = Arc::new(ManualClock::starting_now());
    let memory: Arc<dyn Cache<Value>> =
        Arc::new(MemoryCache::<Value>::with_clock(memory_clock.clone()));

    let durable_clock = Arc::new(ManualClock::starting_now());
    let durable: Arc<dyn Cache<Value>> = Arc::new(DurableCache::with_clock(
        Arc::new(FlakyStore::default()),
        DurableCacheConfig::default(),
        durable_clock.clone(),
    ));

    vec![
        ("memory", memory, memory_clock),
        ("durable", durable, durable_clock),
    ]
}
