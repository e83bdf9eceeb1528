//! Cache Entry Module
//!
//! Defines the structure for stored cache values with TTL support.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A single stored value with optional expiration metadata.
///
/// The value is kept as JSON so plain strings and structured objects share
/// one representation across backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry from a value and a TTL in seconds.
    ///
    /// A zero or negative TTL stores the entry without an expiration
    /// timestamp, meaning it never expires.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds; `<= 0` disables expiration
    pub fn new(value: Value, ttl_seconds: i64) -> Self {
        Self {
            value,
            expires_at: expires_at_from_ttl(ttl_seconds),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so a TTL that has
    /// fully elapsed makes the entry absent immediately.
    ///
    /// # Returns
    /// - `true` if the entry has an expiration time and it has been reached
    /// - `false` if the entry never expires or the TTL hasn't elapsed
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Converts a TTL in seconds into an absolute expiration timestamp.
///
/// # Returns
/// - `Some(now + ttl)` in Unix milliseconds for a positive TTL
/// - `None` for a zero or negative TTL (never expires)
pub fn expires_at_from_ttl(ttl_seconds: i64) -> Option<i64> {
    if ttl_seconds > 0 {
        Some(current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000)))
    } else {
        None
    }
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
