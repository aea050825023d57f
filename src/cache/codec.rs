//! Entry Codec Module
//!
//! Converts entries to and from the string form the persistent tier stores.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Entry Codec ==
/// Explicit serialization boundary for persisted entries.
pub trait EntryCodec<V>: Send + Sync {
    fn encode(&self, entry: &CacheEntry<V>) -> Result<String>;

    fn decode(&self, raw: &str) -> Result<CacheEntry<V>>;
}

// == JSON Codec ==
/// serde_json codec for any serde-capable payload.
pub struct JsonCodec<V> {
    _payload: PhantomData<fn() -> V>,
}

impl<V> JsonCodec<V> {
    pub fn new() -> Self {
        Self {
            _payload: PhantomData,
        }
    }
}

impl<V> Default for JsonCodec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EntryCodec<V> for JsonCodec<V>
where
    V: Serialize + DeserializeOwned,
{
    fn encode(&self, entry: &CacheEntry<V>) -> Result<String> {
        serde_json::to_string(entry).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode(&self, raw: &str) -> Result<CacheEntry<V>> {
        serde_json::from_str(raw).map_err(|e| CacheError::Serialization(e.to_string()))
    }
}
