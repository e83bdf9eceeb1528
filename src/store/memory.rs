//! Memory Cache Module
//!
//! Process-local backend over an LRU structure with per-entry TTL.
//! Capacity eviction is delegated to the `lru` crate; expiration is
//! enforced lazily when an entry is read.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::store::codec::value_as_text;
use crate::store::entry::CacheEntry;
use crate::store::pattern;
use crate::store::service::KeyValueCache;

// == Configuration ==
/// Construction options for [`MemoryCache`].
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries before least-recently-used eviction
    pub max_entries: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self { max_entries: 1000 }
    }
}

// == Memory Cache ==
/// Bounded in-memory cache.
///
/// Hash fields are simulated inside the scalar slot: the entry holds a JSON
/// object used as the field map, so the scalar and hash key-spaces are
/// shared here (unlike the embedded backend, which keeps them separate).
/// Writing a field always re-stores the slot without an expiration
/// timestamp, so a TTL previously set on the key is discarded.
///
/// Reads promote recency, except `has`, which only observes.
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a new memory cache.
    ///
    /// Capacity is clamped to at least one entry.
    ///
    /// # Arguments
    /// * `config` - Capacity options
    pub fn new(config: MemoryCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(MemoryCacheConfig::default())
    }
}

// == Internal Helpers ==
/// Drops the entry at `key` if its TTL has elapsed. Returns true if an
/// expired entry was removed.
fn purge_if_expired(entries: &mut LruCache<String, CacheEntry>, key: &str) -> bool {
    let expired = entries
        .peek(key)
        .map(|entry| entry.is_expired())
        .unwrap_or(false);
    if expired {
        entries.pop(key);
        debug!(key, "dropped expired entry");
    }
    expired
}

/// Inserts an entry, logging the victim when the insert evicts another key.
fn store_entry(entries: &mut LruCache<String, CacheEntry>, key: &str, entry: CacheEntry) {
    if let Some((evicted_key, _)) = entries.push(key.to_string(), entry) {
        if evicted_key != key {
            debug!(key = %evicted_key, "evicted least recently used entry");
        }
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn has(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock();
        purge_if_expired(&mut entries, key);
        Ok(entries.contains(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock();
        purge_if_expired(&mut entries, key);
        Ok(entries.get(key).map(|entry| value_as_text(&entry.value)))
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock();
        purge_if_expired(&mut entries, key);
        let field_value = entries.get(key).and_then(|entry| match &entry.value {
            Value::Object(map) => map.get(field).map(value_as_text),
            _ => None,
        });
        Ok(field_value)
    }

    async fn get_object(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.entries.lock();
        purge_if_expired(&mut entries, key);
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<()> {
        let mut entries = self.entries.lock();
        let entry = CacheEntry::new(Value::String(value.to_string()), ttl_seconds);
        store_entry(&mut entries, key, entry);
        Ok(())
    }

    async fn set_object(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<()> {
        let mut entries = self.entries.lock();
        store_entry(&mut entries, key, CacheEntry::new(value.clone(), ttl_seconds));
        Ok(())
    }

    async fn hash_set(&self, key: &str, field: &str, value: Option<&str>) -> Result<()> {
        let mut entries = self.entries.lock();
        purge_if_expired(&mut entries, key);

        // A non-object slot is replaced by a fresh field map, but only
        // when a field is actually written; an unset has nothing to
        // remove there and leaves the slot alone.
        let mut map = match entries.peek(key) {
            Some(CacheEntry {
                value: Value::Object(map),
                ..
            }) => map.clone(),
            _ if value.is_none() => return Ok(()),
            _ => Map::new(),
        };

        match value {
            Some(value) => {
                map.insert(field.to_string(), Value::String(value.to_string()));
            }
            None => {
                map.remove(field);
            }
        }

        // Field writes never carry a TTL, so the slot loses any it had.
        store_entry(&mut entries, key, CacheEntry::new(Value::Object(map), 0));
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut entries = self.entries.lock();
        let mut deleted = 0;
        for key in keys {
            // An expired entry is already logically absent; reclaim it
            // without counting it.
            if purge_if_expired(&mut entries, key) {
                continue;
            }
            if entries.pop(*key).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let mut entries = self.entries.lock();
        let mut live = Vec::new();
        let mut expired = Vec::new();

        for (key, entry) in entries.iter() {
            if entry.is_expired() {
                expired.push(key.clone());
            } else if pattern.map_or(true, |p| pattern::matches(p, key)) {
                live.push(key.clone());
            }
        }

        for key in expired {
            entries.pop(&key);
            debug!(key = %key, "dropped expired entry");
        }

        Ok(live)
    }

    async fn size(&self, pattern: Option<&str>) -> Result<u64> {
        Ok(self.keys(pattern).await?.len() as u64)
    }
}
