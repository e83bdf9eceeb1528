//! Store Module
//!
//! The cache contract and its four backends: bounded memory, durable
//! embedded, Redis, and null.

mod codec;
mod entry;
mod pattern;

pub mod durable;
pub mod memory;
pub mod null;
pub mod remote;
pub mod service;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use durable::RedbCache;
pub use memory::{MemoryCache, MemoryCacheConfig};
pub use null::NullCache;
pub use remote::RedisCache;
pub use service::{KeyValueCache, KeyValueCacheExt};
