//! Durable Cache Module
//!
//! Embedded backend over a redb database file. Scalar entries and hash
//! fields live in two separate tables, so the two key-spaces never touch:
//! deleting a scalar entry leaves the hash fields stored under the same
//! key name intact.
//!
//! The database is opened lazily on first use. Concurrent first calls
//! share a single initialization; every later call reuses the open handle.

use std::path::PathBuf;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::Result;
use crate::store::codec::value_as_text;
use crate::store::entry::CacheEntry;
use crate::store::pattern;
use crate::store::service::KeyValueCache;

// == Table Definitions ==
/// Scalar entries, stored as JSON-serialized [`CacheEntry`] records.
const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");
/// Hash fields, keyed by `(key, field)`. Fields carry no TTL.
const HASH_FIELDS: TableDefinition<(&str, &str), &str> = TableDefinition::new("hash_fields");

// == Durable Cache ==
/// Persistent cache backed by an embedded redb database.
#[derive(Debug)]
pub struct RedbCache {
    path: PathBuf,
    db: OnceCell<Database>,
}

impl RedbCache {
    // == Constructor ==
    /// Creates a cache over the database file at `path`.
    ///
    /// The file is not opened here; the first operation creates or opens
    /// it and declares the tables.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: OnceCell::new(),
        }
    }

    /// Returns the open database, initializing it exactly once.
    async fn db(&self) -> Result<&Database> {
        self.db
            .get_or_try_init(|| async {
                let db = Database::create(&self.path)?;

                // Declare both tables up front so read transactions never
                // observe a missing table.
                let txn = db.begin_write()?;
                txn.open_table(ENTRIES)?;
                txn.open_table(HASH_FIELDS)?;
                txn.commit()?;
                debug!("declared entry and hash-field tables");

                info!(path = %self.path.display(), "opened cache database");
                Ok(db)
            })
            .await
    }

    /// Fetches the entry for `key` if it is live. A record whose TTL has
    /// elapsed is removed before absence is reported.
    async fn live_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let db = self.db().await?;

        let entry = {
            let txn = db.begin_read()?;
            let table = txn.open_table(ENTRIES)?;
            match table.get(key)? {
                Some(guard) => Some(serde_json::from_slice::<CacheEntry>(guard.value())?),
                None => None,
            }
        };

        match entry {
            Some(entry) if entry.is_expired() => {
                let txn = db.begin_write()?;
                {
                    let mut table = txn.open_table(ENTRIES)?;
                    // The expired entry was seen under an earlier read
                    // snapshot; a concurrent set may have replaced it
                    // since. Remove only what is still expired.
                    let still_expired = match table.get(key)? {
                        Some(guard) => serde_json::from_slice::<CacheEntry>(guard.value())
                            .map(|entry| entry.is_expired())
                            .unwrap_or(true),
                        None => false,
                    };
                    if still_expired {
                        table.remove(key)?;
                        debug!(key, "reclaimed expired entry");
                    }
                }
                txn.commit()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Serializes and stores one scalar entry.
    async fn put_entry(&self, key: &str, entry: CacheEntry) -> Result<()> {
        let db = self.db().await?;
        let bytes = serde_json::to_vec(&entry)?;

        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(ENTRIES)?;
            table.insert(key, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    // == Hash Enumeration ==
    /// Lists all fields of the hash stored at `key`, as `(field, value)`
    /// pairs in field order.
    ///
    /// Fields of one key are contiguous in the table, so this is a single
    /// range scan starting at `(key, "")`.
    pub async fn hash_fields(&self, key: &str) -> Result<Vec<(String, String)>> {
        let db = self.db().await?;
        let txn = db.begin_read()?;
        let table = txn.open_table(HASH_FIELDS)?;

        let mut fields = Vec::new();
        for item in table.range((key, "")..)? {
            let (field_guard, value_guard) = item?;
            let (entry_key, field) = field_guard.value();
            if entry_key != key {
                break;
            }
            fields.push((field.to_string(), value_guard.value().to_string()));
        }
        Ok(fields)
    }
}

#[async_trait]
impl KeyValueCache for RedbCache {
    async fn has(&self, key: &str) -> Result<bool> {
        Ok(self.live_entry(key).await?.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = self.live_entry(key).await?;
        Ok(entry.map(|entry| value_as_text(&entry.value)))
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        let db = self.db().await?;
        let txn = db.begin_read()?;
        let table = txn.open_table(HASH_FIELDS)?;
        Ok(table.get((key, field))?.map(|guard| guard.value().to_string()))
    }

    async fn get_object(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.live_entry(key).await?.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<()> {
        let entry = CacheEntry::new(Value::String(value.to_string()), ttl_seconds);
        self.put_entry(key, entry).await
    }

    async fn set_object(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<()> {
        self.put_entry(key, CacheEntry::new(value.clone(), ttl_seconds)).await
    }

    async fn hash_set(&self, key: &str, field: &str, value: Option<&str>) -> Result<()> {
        let db = self.db().await?;
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(HASH_FIELDS)?;
            match value {
                Some(value) => {
                    table.insert((key, field), value)?;
                }
                None => {
                    table.remove((key, field))?;
                }
            }
        }
        txn.commit()?;
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let db = self.db().await?;
        let mut deleted = 0;

        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(ENTRIES)?;
            for key in keys {
                if let Some(guard) = table.remove(*key)? {
                    // An expired record was already logically absent, so
                    // removing it does not count. Records that no longer
                    // decode do.
                    let live = serde_json::from_slice::<CacheEntry>(guard.value())
                        .map(|entry| !entry.is_expired())
                        .unwrap_or(true);
                    if live {
                        deleted += 1;
                    }
                }
            }
        }
        txn.commit()?;
        Ok(deleted)
    }

    async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let db = self.db().await?;
        let txn = db.begin_read()?;
        let table = txn.open_table(ENTRIES)?;

        let mut keys = Vec::new();
        for item in table.iter()? {
            let (key_guard, value_guard) = item?;
            let entry: CacheEntry = serde_json::from_slice(value_guard.value())?;
            if entry.is_expired() {
                continue;
            }
            let key = key_guard.value();
            if pattern.map_or(true, |p| pattern::matches(p, key)) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }

    async fn size(&self, pattern: Option<&str>) -> Result<u64> {
        Ok(self.keys(pattern).await?.len() as u64)
    }
}
