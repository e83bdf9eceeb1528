//! Cache Service Contract
//!
//! The `KeyValueCache` trait every backend implements, and a typed
//! extension trait for storing serde values without hand-written JSON
//! plumbing. Callers hold an `Arc<dyn KeyValueCache>` and stay agnostic
//! about which backend is underneath.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

// == Cache Contract ==
/// Uniform contract over the memory, embedded, Redis, and null backends.
///
/// Two rules hold everywhere:
///
/// - A missing or expired entry is reported as absent (`Ok(None)`,
///   `Ok(false)`, an empty list, or a zero count), never as an error.
/// - A backend failure (storage, network, decoding) is reported as an
///   error, never as absent.
///
/// Scalar entries may carry a TTL; hash fields never expire. Entries whose
/// TTL has elapsed are treated as absent by every read operation, and
/// backends that can delete reclaim them when they are next touched.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Reports whether a live (non-expired) entry exists for `key`.
    async fn has(&self, key: &str) -> Result<bool>;

    /// Returns the stored value for `key` as text.
    ///
    /// Values written by [`set`](Self::set) come back verbatim; structured
    /// values written by [`set_object`](Self::set_object) come back as
    /// compact JSON text.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Returns one field of the hash stored at `key`.
    ///
    /// Absent key and absent field are indistinguishable: both are `None`.
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Returns the structured value stored at `key`.
    ///
    /// Guaranteed to round-trip values written by
    /// [`set_object`](Self::set_object). A stored payload that cannot be
    /// decoded is a [`Serialization`](crate::CacheError::Serialization)
    /// error.
    async fn get_object(&self, key: &str) -> Result<Option<Value>>;

    /// Stores text under `key`, overwriting any previous entry.
    ///
    /// # Arguments
    /// * `key` - Entry key
    /// * `value` - Text to store
    /// * `ttl_seconds` - Seconds until expiry; `<= 0` means never expires
    async fn set(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<()>;

    /// Stores a structured value under `key`, overwriting any previous
    /// entry. Same TTL rules as [`set`](Self::set).
    async fn set_object(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<()>;

    /// Writes or removes one field of the hash stored at `key`.
    ///
    /// `Some(value)` upserts the field, creating the hash if needed.
    /// `None` deletes the field.
    async fn hash_set(&self, key: &str, field: &str, value: Option<&str>) -> Result<()>;

    /// Deletes the given keys.
    ///
    /// Returns how many of them actually existed and were removed. An empty
    /// slice resolves immediately with `0`, without touching the backend.
    async fn delete(&self, keys: &[&str]) -> Result<u64>;

    /// Lists all live keys matching `pattern` (`*` and `?` wildcards).
    ///
    /// `None` lists every key. The result is a full enumeration; there is
    /// no pagination.
    async fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>>;

    /// Counts live entries, optionally restricted to `pattern`.
    async fn size(&self, pattern: Option<&str>) -> Result<u64>;
}

// == Typed Extension ==
/// Typed convenience layer over [`get_object`](KeyValueCache::get_object) /
/// [`set_object`](KeyValueCache::set_object).
///
/// Blanket-implemented for every backend, `dyn KeyValueCache` included, so
/// callers can round-trip their own serde types:
///
/// ```ignore
/// cache.set_typed("user:1", &user, 300).await?;
/// let user: Option<User> = cache.get_typed("user:1").await?;
/// ```
#[async_trait]
pub trait KeyValueCacheExt: KeyValueCache {
    /// Reads and deserializes the structured value stored at `key`.
    async fn get_typed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_object(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serializes and stores `value` under `key`.
    async fn set_typed<T>(&self, key: &str, value: &T, ttl_seconds: i64) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value)?;
        self.set_object(key, &value, ttl_seconds).await
    }
}

impl<T: KeyValueCache + ?Sized> KeyValueCacheExt for T {}
