//! Request DTOs for the inspection API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::CacheCategory;

/// Request body for `PUT /cache/:key`
///
/// # Fields
/// - `value`: Any JSON payload to cache
/// - `ttl_ms`: Optional explicit TTL in milliseconds
/// - `category`: Optional catalog category selecting its default TTL
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub value: Value,
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    #[serde(default)]
    pub category: Option<CacheCategory>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.ttl_ms == Some(0) {
            return Some("TTL must be greater than zero".to_string());
        }
        if self.ttl_ms.is_some() && self.category.is_some() {
            return Some("Specify either ttl_ms or category, not both".to_string());
        }
        None
    }
}
