//! Request DTOs for the inspection API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::SetOptions;

/// Request body for `PUT /stores/:name/set`
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value except `null`
/// - `ttl_ms`: Optional TTL in milliseconds (store default if not specified)
/// - `ignore_ttl`: Store without any expiry
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    #[serde(default)]
    pub ignore_ttl: bool,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("cannot set value without a key".to_string());
        }
        if self.value.is_null() {
            return Some("cannot set undefined or null".to_string());
        }
        None
    }

    /// Write options carried by this request.
    pub fn options(&self) -> SetOptions {
        SetOptions {
            ignore_ttl: self.ignore_ttl,
            ttl: self.ttl_ms.map(Duration::from_millis),
        }
    }
}

/// Query string for `DELETE /stores/:name`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RemoveStoreQuery {
    /// Flush the store before unregistering it
    #[serde(default)]
    pub flush: bool,
}
