//! Memory Tier Module
//!
//! Bounded in-process key -> entry table with LRU eviction.

use std::collections::HashMap;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, LruTracker};

// == Memory Tier ==
/// Fast, volatile storage for live entries.
///
/// Expired entries are not removed on read; `mem_get` just refuses to return
/// them. Physical removal is left to `purge_expired` (the sweeper) and to
/// overwrites.
#[derive(Debug)]
pub struct MemoryTier<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    max_entries: usize,
}

impl<V> MemoryTier<V> {
    /// Creates an empty tier holding at most `max_entries` entries (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// When the tier is full and `key` is new, the least recently accessed
    /// entry is evicted first and its key returned.
    pub fn mem_set(&mut self, key: &str, entry: CacheEntry<V>) -> Option<String> {
        let mut evicted = None;

        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            if let Some(victim) = self.lru.evict_oldest() {
                self.entries.remove(&victim);
                evicted = Some(victim);
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
        evicted
    }

    // == Get ==
    /// Returns the entry only if present and unexpired.
    pub fn mem_get(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    // == Read ==
    /// Returns a live entry and records the read: bumps its hit count,
    /// refreshes `last_accessed_at` and makes it the most recently used key.
    pub fn read(&mut self, key: &str) -> Option<&CacheEntry<V>> {
        let entry = self.entries.get_mut(key)?;
        if entry.is_expired() {
            return None;
        }
        entry.record_access();
        self.lru.touch(key);
        Some(entry)
    }

    // == Delete ==
    /// Removes `key`. Returns whether anything was stored under it.
    pub fn mem_delete(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    // == Purge Expired ==
    /// Removes every expired entry, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        expired.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Stored entries that have not yet expired.
    pub fn live_len(&self) -> usize {
        let now = current_timestamp_ms();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is physically stored, regardless of expiry.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
