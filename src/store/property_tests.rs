//! Property-Based Tests for the Store Module
//!
//! Uses proptest to verify the contract laws on the in-memory backend and
//! the glob matcher said laws rely on.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::store::memory::{MemoryCache, MemoryCacheConfig};
use crate::store::pattern;
use crate::store::service::KeyValueCache;

// == Strategies ==
/// Generates cache keys (non-empty, wildcard-free)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for model-based testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a pair and reading it back (before any expiration) returns
    // exactly the stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let retrieved = rt.block_on(async {
            let cache = MemoryCache::default();
            cache.set(&key, &value, 0).await.unwrap();
            cache.get(&key).await.unwrap()
        });
        prop_assert_eq!(retrieved, Some(value));
    }

    // Writing twice under one key leaves exactly one entry holding the
    // second value.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (retrieved, size) = rt.block_on(async {
            let cache = MemoryCache::default();
            cache.set(&key, &value1, 0).await.unwrap();
            cache.set(&key, &value2, 0).await.unwrap();
            (cache.get(&key).await.unwrap(), cache.size(None).await.unwrap())
        });
        prop_assert_eq!(retrieved, Some(value2));
        prop_assert_eq!(size, 1);
    }

    // After a delete, the key reads as absent and the delete reported
    // exactly one removal.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (deleted, retrieved, present) = rt.block_on(async {
            let cache = MemoryCache::default();
            cache.set(&key, &value, 0).await.unwrap();
            let deleted = cache.delete(&[key.as_str()]).await.unwrap();
            (deleted, cache.get(&key).await.unwrap(), cache.has(&key).await.unwrap())
        });
        prop_assert_eq!(deleted, 1);
        prop_assert_eq!(retrieved, None);
        prop_assert!(!present);
    }

    // No write sequence can push the entry count past the configured
    // capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let max_entries = 50;
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = MemoryCache::new(MemoryCacheConfig { max_entries });
            for (key, value) in &entries {
                cache.set(key, value, 0).await.unwrap();
                let size = cache.size(None).await.unwrap();
                prop_assert!(
                    size <= max_entries as u64,
                    "Cache size {} exceeds max {}",
                    size,
                    max_entries
                );
            }
            Ok(())
        })?;
    }

    // A written hash field reads back verbatim, and unsetting it makes it
    // absent again.
    #[test]
    fn prop_hash_field_round_trip(
        key in valid_key_strategy(),
        field in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (set_read, unset_read) = rt.block_on(async {
            let cache = MemoryCache::default();
            cache.hash_set(&key, &field, Some(&value)).await.unwrap();
            let set_read = cache.hash_get(&key, &field).await.unwrap();
            cache.hash_set(&key, &field, None).await.unwrap();
            (set_read, cache.hash_get(&key, &field).await.unwrap())
        });
        prop_assert_eq!(set_read, Some(value));
        prop_assert_eq!(unset_read, None);
    }

    // Any interleaving of sets and deletes leaves the cache agreeing with
    // a plain map model, delete counts included.
    #[test]
    fn prop_model_consistency(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = MemoryCache::default();
            let mut model: HashMap<String, String> = HashMap::new();

            for op in &ops {
                match op {
                    CacheOp::Set { key, value } => {
                        cache.set(key, value, 0).await.unwrap();
                        model.insert(key.clone(), value.clone());
                    }
                    CacheOp::Delete { key } => {
                        let deleted = cache.delete(&[key.as_str()]).await.unwrap();
                        let expected = u64::from(model.remove(key).is_some());
                        prop_assert_eq!(deleted, expected, "delete count diverged from model");
                    }
                }
            }

            for (key, value) in &model {
                prop_assert_eq!(cache.get(key).await.unwrap(), Some(value.clone()));
            }
            prop_assert_eq!(cache.size(None).await.unwrap(), model.len() as u64);
            Ok(())
        })?;
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // An entry stored with a positive TTL is readable before the TTL
    // elapses and absent afterwards.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (before, after, present_after) = rt.block_on(async {
            let cache = MemoryCache::default();
            cache.set(&key, &value, 1).await.unwrap();
            let before = cache.get(&key).await.unwrap();

            tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

            (before, cache.get(&key).await.unwrap(), cache.has(&key).await.unwrap())
        });
        prop_assert_eq!(before, Some(value));
        prop_assert_eq!(after, None);
        prop_assert!(!present_after);
    }
}

// Property tests for the glob matcher backing keys() and size()
proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // A wildcard-free pattern matches exactly itself.
    #[test]
    fn prop_pattern_literal_matches_itself(key in valid_key_strategy()) {
        prop_assert!(pattern::matches(&key, &key));
    }

    // The bare star matches every key.
    #[test]
    fn prop_pattern_star_matches_everything(key in valid_key_strategy()) {
        prop_assert!(pattern::matches("*", &key));
    }

    // Truncating a key anywhere and appending a star yields a matching
    // prefix pattern.
    #[test]
    fn prop_pattern_prefix_star(
        key in valid_key_strategy(),
        idx in any::<prop::sample::Index>()
    ) {
        let split = idx.index(key.len() + 1);
        let prefix_pattern = format!("{}*", &key[..split]);
        prop_assert!(pattern::matches(&prefix_pattern, &key));
    }

    // Replacing any single character with `?` still matches.
    #[test]
    fn prop_pattern_question_mark(
        key in valid_key_strategy(),
        idx in any::<prop::sample::Index>()
    ) {
        let i = idx.index(key.len());
        let mut chars: Vec<char> = key.chars().collect();
        chars[i] = '?';
        let question_pattern: String = chars.into_iter().collect();
        prop_assert!(pattern::matches(&question_pattern, &key));
    }
}
