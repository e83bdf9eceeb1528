//! Error types for the cache backends
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for all cache backends.
///
/// A missing or expired key is never an error: read operations report it as
/// `Ok(None)` (or `Ok(false)`). Errors are reserved for backend failures,
/// so callers can tell "not cached" apart from "cache unreachable".
#[derive(Error, Debug)]
pub enum CacheError {
    /// Embedded database failure (open, transaction, table, or commit)
    #[error("Storage error: {0}")]
    Storage(#[from] redb::Error),

    /// Redis connectivity or protocol failure
    #[error("Redis error: {0}")]
    Remote(#[from] redis::RedisError),

    /// Structured value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Storage Error Conversions ==
// redb surfaces a distinct error type per operation; route each of them
// through the umbrella `redb::Error`.

impl From<redb::DatabaseError> for CacheError {
    fn from(err: redb::DatabaseError) -> Self {
        CacheError::Storage(err.into())
    }
}

impl From<redb::TransactionError> for CacheError {
    fn from(err: redb::TransactionError) -> Self {
        CacheError::Storage(err.into())
    }
}

impl From<redb::TableError> for CacheError {
    fn from(err: redb::TableError) -> Self {
        CacheError::Storage(err.into())
    }
}

impl From<redb::StorageError> for CacheError {
    fn from(err: redb::StorageError) -> Self {
        CacheError::Storage(err.into())
    }
}

impl From<redb::CommitError> for CacheError {
    fn from(err: redb::CommitError) -> Self {
        CacheError::Storage(err.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
