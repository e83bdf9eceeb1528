//! Uniform key-value caching over interchangeable backends.
//!
//! Four backends implement one [`KeyValueCache`] contract:
//!
//! - [`MemoryCache`]: process-local, capacity-bounded, LRU-evicting
//! - [`RedbCache`]: persistent embedded database, with scalar entries and
//!   hash fields in separate tables
//! - [`RedisCache`]: remote Redis server over an injected connection
//! - [`NullCache`]: accepts and discards writes, reports all reads absent
//!
//! Callers hold an `Arc<dyn KeyValueCache>` and pick the backend at
//! construction time; everything downstream stays backend-agnostic.
//!
//! # Example
//!
//! ```
//! use kv_cache::{KeyValueCache, MemoryCache};
//!
//! tokio_test::block_on(async {
//!     let cache = MemoryCache::default();
//!
//!     cache.set("greeting", "hello", 60).await.unwrap();
//!     assert_eq!(cache.get("greeting").await.unwrap(), Some("hello".to_string()));
//!
//!     // Absent keys read as None, not as an error
//!     assert_eq!(cache.get("missing").await.unwrap(), None);
//! });
//! ```

pub mod error;
pub mod store;

pub use error::{CacheError, Result};
pub use store::{
    KeyValueCache, KeyValueCacheExt, MemoryCache, MemoryCacheConfig, NullCache, RedbCache,
    RedisCache,
};
