//! Remote Cache Module
//!
//! Redis-backed cache over an injected connection handle. Expiration and
//! hash fields map onto native Redis commands; structured values travel
//! in the JSON envelope from the codec module.
//!
//! Connection lifecycle belongs to the caller: this backend never opens,
//! re-authenticates, or retries the connection. Failures surface to the
//! caller unchanged.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;

use crate::error::Result;
use crate::store::codec::{decode_object, encode_object};
use crate::store::service::KeyValueCache;

// == Remote Cache ==
/// Cache backed by a Redis server.
///
/// Scalar values and hashes live in the server's one key-space, so a key
/// holds either a string or a hash, never both (unlike the embedded
/// backend, which keeps the two apart).
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    // == Constructor ==
    /// Creates a cache over an already-established connection.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    // == Bulk Field Removal ==
    /// Removes several fields of the hash at `key` with one command.
    ///
    /// Returns the number of fields that existed and were removed. An
    /// empty field list resolves immediately with `0`.
    pub async fn hash_delete_fields(&self, key: &str, fields: &[&str]) -> Result<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        Ok(conn.hdel(key, fields).await?)
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn has(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hget(key, field).await?)
    }

    async fn get_object(&self, key: &str) -> Result<Option<Value>> {
        match self.get(key).await? {
            Some(text) => Ok(Some(decode_object(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        if ttl_seconds > 0 {
            conn.set_ex::<_, _, ()>(key, value, ttl_seconds as u64).await?;
        } else {
            conn.set::<_, _, ()>(key, value).await?;
        }
        Ok(())
    }

    async fn set_object(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<()> {
        let text = encode_object(value)?;
        self.set(key, &text, ttl_seconds).await
    }

    async fn hash_set(&self, key: &str, field: &str, value: Option<&str>) -> Result<()> {
        let mut conn = self.conn.clone();
        match value {
            Some(value) => {
                conn.hset::<_, _, _, ()>(key, field, value).await?;
            }
            None => {
                conn.hdel::<_, _, ()>(key, field).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<u64> {
        // A zero-key DEL is a protocol error, and the contract wants the
        // degenerate case to resolve without a round-trip anyway.
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        Ok(conn.del(keys).await?)
    }

    async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.keys(pattern.unwrap_or("*")).await?)
    }

    async fn size(&self, pattern: Option<&str>) -> Result<u64> {
        match pattern {
            // DBSIZE takes no pattern; a filtered count enumerates instead.
            Some(pattern) => Ok(self.keys(Some(pattern)).await?.len() as u64),
            None => {
                let mut conn = self.conn.clone();
                Ok(redis::cmd("DBSIZE").query_async(&mut conn).await?)
            }
        }
    }
}
