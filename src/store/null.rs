//! Null Cache Module
//!
//! An inert backend: every write is accepted and discarded, every read
//! reports absent. Lets calling code keep a single cache code path when
//! caching is switched off.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::store::service::KeyValueCache;

// == Null Cache ==
/// Backend that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    /// Creates a new inert cache.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueCache for NullCache {
    async fn has(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn hash_get(&self, _key: &str, _field: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn get_object(&self, _key: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: i64) -> Result<()> {
        Ok(())
    }

    async fn set_object(&self, _key: &str, _value: &Value, _ttl_seconds: i64) -> Result<()> {
        Ok(())
    }

    async fn hash_set(&self, _key: &str, _field: &str, _value: Option<&str>) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _keys: &[&str]) -> Result<u64> {
        Ok(0)
    }

    async fn keys(&self, _pattern: Option<&str>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn size(&self, _pattern: Option<&str>) -> Result<u64> {
        Ok(0)
    }
}
