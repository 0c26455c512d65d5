//! Property-Based Tests for the in-memory backend
//!
//! Uses proptest with a manual clock, so expiry properties need no sleeping.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, MemoryCache};
use crate::clock::ManualClock;

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// A step in a generated cache history
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl: i64 },
    Get { key: String },
    Advance { millis: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy(), -2i64..10)
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        (0u64..5_000).prop_map(|millis| CacheOp::Advance { millis }),
    ]
}

fn new_cache() -> (MemoryCache<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    (MemoryCache::with_clock(clock.clone()), clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A key that was never written reads as absent.
    #[test]
    fn prop_unwritten_key_is_absent(key in valid_key_strategy()) {
        let (cache, _) = new_cache();
        let got = tokio_test::block_on(cache.get(&key)).unwrap();
        prop_assert_eq!(got, None);
    }

    // Storing then reading before expiry returns the stored value.
    #[test]
    fn prop_roundtrip_storage(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in 1i64..100_000
    ) {
        let (cache, _) = new_cache();

        tokio_test::block_on(async {
            cache.set(&key, value.clone(), ttl).await.unwrap();
            let retrieved = cache.get(&key).await.unwrap();
            prop_assert_eq!(retrieved, Some(value));
            Ok::<(), TestCaseError>(())
        })?;
    }

    // Once more than ttl seconds pass, the entry is gone.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in 1i64..3_600,
        extra_ms in 0u64..10_000
    ) {
        let (cache, clock) = new_cache();

        tokio_test::block_on(async {
            cache.set(&key, value, ttl).await.unwrap();
            clock.advance(Duration::from_secs(ttl as u64) + Duration::from_millis(extra_ms));
            prop_assert_eq!(cache.get(&key).await.unwrap(), None);
            Ok::<(), TestCaseError>(())
        })?;
    }

    // The second write wins, value and expiry alike.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy(),
        ttl1 in 1i64..100,
        ttl2 in 1i64..100
    ) {
        let (cache, clock) = new_cache();

        tokio_test::block_on(async {
            cache.set(&key, value1, ttl1).await.unwrap();
            cache.set(&key, value2.clone(), ttl2).await.unwrap();

            prop_assert_eq!(cache.get(&key).await.unwrap(), Some(value2));

            clock.advance(Duration::from_secs(ttl2 as u64));
            prop_assert_eq!(cache.get(&key).await.unwrap(), None);
            Ok::<(), TestCaseError>(())
        })?;
    }

    // Any history of sets, gets and clock moves agrees with a simple model.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (cache, clock) = new_cache();
        // key -> (value, expiry in ms since start)
        let mut model: HashMap<String, (String, i64)> = HashMap::new();
        let mut now_ms: i64 = 0;
        let mut expected_hits = 0u64;

        tokio_test::block_on(async {
            for op in ops {
                match op {
                    CacheOp::Set { key, value, ttl } => {
                        cache.set(&key, value.clone(), ttl).await.unwrap();
                        if ttl > 0 {
                            model.insert(key, (value, now_ms + ttl * 1000));
                        } else {
                            model.remove(&key);
                        }
                    }
                    CacheOp::Get { key } => {
                        let expected = model
                            .get(&key)
                            .filter(|(_, expires)| now_ms < *expires)
                            .map(|(value, _)| value.clone());
                        if expected.is_some() {
                            expected_hits += 1;
                        }
                        prop_assert_eq!(cache.get(&key).await.unwrap(), expected);
                    }
                    CacheOp::Advance { millis } => {
                        clock.advance(Duration::from_millis(millis));
                        now_ms += millis as i64;
                    }
                }
            }
            Ok::<(), TestCaseError>(())
        })?;

        prop_assert_eq!(cache.stats().hits, expected_hits, "Hits mismatch");
    }

    // Non-positive TTLs never leave a readable entry behind.
    #[test]
    fn prop_non_positive_ttl_is_absent(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in -1_000i64..=0
    ) {
        let (cache, _) = new_cache();

        tokio_test::block_on(async {
            cache.set(&key, "earlier".to_string(), 60).await.unwrap();
            cache.set(&key, value, ttl).await.unwrap();
            prop_assert_eq!(cache.get(&key).await.unwrap(), None);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
