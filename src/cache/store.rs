//! Catalog Cache Module
//!
//! The façade callers use: coordinates the memory and persistent tiers and
//! keeps the statistics. No operation here returns an error; every internal
//! fault degrades to a miss or a skipped persistent write.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{
    CacheCategory, CacheEntry, CacheStats, EntryCodec, JsonCodec, MemoryTier, PersistOutcome,
    PersistentTier, StatsSnapshot,
};
use crate::config::Config;
use crate::storage::StorageBackend;

// == Sweep Report ==
/// Entries removed by one expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub memory_removed: usize,
    pub persistent_removed: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.memory_removed + self.persistent_removed
    }
}

// == Catalog Cache ==
/// Two-tier cache for catalog payloads of type `V`.
///
/// Reads check the memory tier first, then the persistent tier; a persistent
/// hit is promoted back into memory with its original expiry.
#[derive(Debug)]
pub struct CatalogCache<V> {
    memory: MemoryTier<V>,
    persistent: PersistentTier<V>,
    stats: CacheStats,
    default_ttl: Duration,
}

impl<V> CatalogCache<V>
where
    V: Clone + Serialize + DeserializeOwned + 'static,
{
    /// Builds a cache persisting through `backend` as JSON.
    ///
    /// `backend = None` runs memory-only, as on a host with no storage.
    pub fn new(config: &Config, backend: Option<Box<dyn StorageBackend>>) -> Self {
        Self::with_codec(config, backend, Box::new(JsonCodec::new()))
    }

    pub fn memory_only(config: &Config) -> Self {
        Self::new(config, None)
    }
}

impl<V: Clone> CatalogCache<V> {
    pub fn with_codec(
        config: &Config,
        backend: Option<Box<dyn StorageBackend>>,
        codec: Box<dyn EntryCodec<V>>,
    ) -> Self {
        Self {
            memory: MemoryTier::new(config.max_entries),
            persistent: PersistentTier::new(
                backend,
                codec,
                config.key_prefix.clone(),
                config.max_persist_bytes,
            ),
            stats: CacheStats::new(),
            default_ttl: config.default_ttl,
        }
    }

    // == Set ==
    /// Stores `data` under `key` for `ttl` (default TTL when `None`).
    ///
    /// The memory write always happens; the returned outcome only describes
    /// the best-effort persistent write.
    pub fn set(&mut self, key: &str, data: V, ttl: Option<Duration>) -> PersistOutcome {
        let entry = CacheEntry::new(data, ttl.unwrap_or(self.default_ttl));
        let outcome = self.persistent.persist_set(key, &entry);

        self.insert_memory(key, entry);
        self.stats.record_set();
        outcome
    }

    // == Get ==
    /// Returns the live value for `key` from either tier.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if let Some(entry) = self.memory.read(key) {
            let data = entry.data.clone();
            self.stats.record_hit();
            return Some(data);
        }

        if let Some(mut entry) = self.persistent.persist_get(key).into_entry() {
            entry.record_access();
            let data = entry.data.clone();
            self.insert_memory(key, entry);
            self.stats.record_hit();
            debug!("Promoted '{}' from persistent tier", key);
            return Some(data);
        }

        self.stats.record_miss();
        None
    }

    /// [`get`](Self::get) plus a log record of the hit or miss.
    pub fn get_with_stats(&mut self, key: &str) -> Option<V> {
        let value = self.get(key);
        if value.is_some() {
            info!("Cache hit: {}", key);
        } else {
            info!("Cache miss: {}", key);
        }
        value
    }

    // == Delete ==
    /// Removes `key` from both tiers. Counted once whether or not it existed.
    pub fn delete(&mut self, key: &str) {
        self.memory.mem_delete(key);
        self.persistent.persist_delete(key);
        self.stats.record_delete();
    }

    // == Clear ==
    /// Empties the memory tier and the persistent namespace. Statistics are kept.
    pub fn clear(&mut self) {
        let in_memory = self.memory.len();
        self.memory.clear();
        let persisted = self.persistent.persist_clear();
        info!(
            "Cache cleared: {} memory entries, {} persistent records",
            in_memory, persisted
        );
    }

    // == Category Setters ==
    /// Stores `data` with the category's default TTL.
    pub fn set_category(&mut self, category: CacheCategory, key: &str, data: V) -> PersistOutcome {
        self.set(key, data, Some(category.default_ttl()))
    }

    pub fn set_genres(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::Genres, key, data)
    }

    pub fn set_movies(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::Movies, key, data)
    }

    pub fn set_series(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::Series, key, data)
    }

    pub fn set_movie_details(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::MovieDetails, key, data)
    }

    pub fn set_search(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::Search, key, data)
    }

    pub fn set_user_data(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::UserData, key, data)
    }

    pub fn set_trending(&mut self, key: &str, data: V) -> PersistOutcome {
        self.set_category(CacheCategory::Trending, key, data)
    }

    // == Stats ==
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.memory.live_len())
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
    }

    // == Sweep ==
    /// Purges expired entries from memory and expired or corrupt records from
    /// the persistent namespace.
    pub fn sweep_expired(&mut self) -> SweepReport {
        SweepReport {
            memory_removed: self.memory.purge_expired(),
            persistent_removed: self.persistent.sweep(),
        }
    }

    // == Inspection ==
    /// Whether `key` is physically held by the memory tier.
    pub fn contains_in_memory(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    /// Expiry of the live memory entry for `key`, in Unix milliseconds.
    pub fn expires_at(&self, key: &str) -> Option<u64> {
        self.memory.mem_get(key).map(|entry| entry.expires_at)
    }

    /// Drops the memory tier only, leaving persisted records in place (what
    /// a process restart looks like to the persistent tier).
    pub fn reset_memory_tier(&mut self) {
        self.memory.clear();
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn persistence_enabled(&self) -> bool {
        self.persistent.is_enabled()
    }

    fn insert_memory(&mut self, key: &str, entry: CacheEntry<V>) {
        if let Some(evicted) = self.memory.mem_set(key, entry) {
            self.stats.record_eviction();
            debug!("Evicted '{}' from memory tier", evicted);
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::current_timestamp_ms;
    use crate::storage::MemoryBackend;
    use std::thread::sleep;

    fn config(max_entries: usize) -> Config {
        Config {
            max_entries,
            ..Config::default()
        }
    }

    fn cache_with(backend: &MemoryBackend, max_entries: usize) -> CatalogCache<String> {
        CatalogCache::new(&config(max_entries), Some(Box::new(backend.clone())))
    }

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn test_set_and_get() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 10);

        assert_eq!(cache.set("genres_movie", s("Action"), None), PersistOutcome::Stored);
        assert_eq!(cache.get("genres_movie"), Some(s("Action")));
        assert_eq!(cache.get("unknown"), None);
    }

    #[test]
    fn test_ttl_expiry() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 10);

        cache.set("k", s("v"), Some(Duration::from_millis(100)));
        assert_eq!(cache.get("k"), Some(s("v")));

        sleep(Duration::from_millis(150));

        assert_eq!(cache.get("k"), None);
        // The persistent record was cleaned up on that read.
        assert_eq!(backend.get_item("catalog_cache:k").unwrap(), None);
    }

    #[test]
    fn test_effectively_unbounded_ttl_keeps_value() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 10);

        let ttl = Duration::from_millis(u64::MAX) + Duration::from_millis(1);
        cache.set("k", s("v"), Some(ttl));
        sleep(Duration::from_millis(5));

        assert_eq!(cache.get("k"), Some(s("v")));
    }

    #[test]
    fn test_default_ttl_applies() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&Config {
            default_ttl: Duration::from_millis(50),
            ..Config::default()
        });

        cache.set("k", s("v"), None);
        sleep(Duration::from_millis(80));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_lru_eviction_in_memory_tier() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(3));

        cache.set("a", s("1"), None);
        cache.set("b", s("2"), None);
        cache.set("c", s("3"), None);
        cache.set("d", s("4"), None);

        assert!(!cache.contains_in_memory("a"));
        assert_eq!(cache.memory_len(), 3);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(3));

        cache.set("a", s("1"), None);
        cache.set("b", s("2"), None);
        cache.set("c", s("3"), None);
        cache.get("a");
        cache.set("d", s("4"), None);

        assert!(cache.contains_in_memory("a"));
        assert!(!cache.contains_in_memory("b"));
    }

    #[test]
    fn test_evicted_key_still_served_from_persistent_tier() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 3);

        for key in ["a", "b", "c", "d"] {
            cache.set(key, key.to_uppercase(), None);
        }
        assert!(!cache.contains_in_memory("a"));

        assert_eq!(cache.get("a"), Some(s("A")));
        assert!(cache.contains_in_memory("a"));
        // Promoting "a" pushed out the next least recent key.
        assert!(!cache.contains_in_memory("b"));
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_promotion_on_persistent_hit() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 10);

        cache.set("movie_details_603", s("The Matrix"), Some(Duration::from_secs(60)));
        let original_expiry = cache.expires_at("movie_details_603").unwrap();
        cache.reset_memory_tier();
        assert!(!cache.contains_in_memory("movie_details_603"));

        assert_eq!(cache.get("movie_details_603"), Some(s("The Matrix")));
        assert!(cache.contains_in_memory("movie_details_603"));
        assert_eq!(cache.expires_at("movie_details_603"), Some(original_expiry));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_second_process_reads_persisted_value() {
        let backend = MemoryBackend::new();
        let mut first = cache_with(&backend, 10);
        first.set_genres("genres_tv", s("Drama"));

        let mut second = cache_with(&backend, 10);
        assert_eq!(second.get("genres_tv"), Some(s("Drama")));
        assert!(second.contains_in_memory("genres_tv"));
    }

    #[test]
    fn test_idempotent_delete() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));

        cache.delete("never_set");
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.deletes, 1);

        cache.set("k", s("v"), None);
        cache.delete("k");
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().deletes, 2);
    }

    #[test]
    fn test_delete_removes_from_both_tiers() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 10);

        cache.set("k", s("v"), None);
        cache.delete("k");

        assert!(!cache.contains_in_memory("k"));
        assert_eq!(backend.get_item("catalog_cache:k").unwrap(), None);
        assert_eq!(cache.stats().deletes, 1);
    }

    #[test]
    fn test_statistics_correctness() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));

        cache.set("a", s("1"), None);
        cache.set("b", s("2"), None);
        cache.get("a");
        cache.get("b");
        cache.get("a");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.sets, 2);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.memory_size, 2);
        assert_eq!(stats.hit_rate, 0.75);
    }

    #[test]
    fn test_hit_rate_zero_without_reads() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));
        cache.set("a", s("1"), None);
        assert_eq!(cache.stats().hit_rate, 0.0);
    }

    #[test]
    fn test_get_with_stats_matches_get() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));
        cache.set("a", s("1"), None);

        assert_eq!(cache.get_with_stats("a"), Some(s("1")));
        assert_eq!(cache.get_with_stats("b"), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_clear_scoping() {
        let backend = MemoryBackend::new();
        backend.set_item("auth_session", "token").unwrap();
        let mut cache = cache_with(&backend, 10);

        cache.set("a", s("1"), None);
        cache.get("a");
        cache.clear();

        assert_eq!(cache.get("a"), None);
        assert_eq!(backend.get_item("auth_session").unwrap().as_deref(), Some("token"));
        // Counters survive a clear.
        let stats = cache.stats();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_reset_stats() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));
        cache.set("a", s("1"), None);
        cache.get("a");
        cache.reset_stats();

        let stats = cache.stats();
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.memory_size, 1);
    }

    #[test]
    fn test_category_default_ttls() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));
        let now = current_timestamp_ms();
        let tolerance = 5_000;

        cache.set_genres("g", s("genres"));
        cache.set_trending("t", s("trending"));
        assert_eq!(cache.get("g"), Some(s("genres")));

        let genres_expiry = cache.expires_at("g").unwrap();
        let trending_expiry = cache.expires_at("t").unwrap();
        assert!(genres_expiry.abs_diff(now + 24 * 3_600_000) < tolerance);
        assert!(trending_expiry.abs_diff(now + 5 * 60_000) < tolerance);
    }

    #[test]
    fn test_every_category_setter_uses_its_ttl() {
        let mut cache: CatalogCache<String> = CatalogCache::memory_only(&config(10));
        let now = current_timestamp_ms();

        cache.set_movies("m", s("1"));
        cache.set_series("s", s("2"));
        cache.set_movie_details("d", s("3"));
        cache.set_search("q", s("4"));
        cache.set_user_data("u", s("5"));

        for (key, category) in [
            ("m", CacheCategory::Movies),
            ("s", CacheCategory::Series),
            ("d", CacheCategory::MovieDetails),
            ("q", CacheCategory::Search),
            ("u", CacheCategory::UserData),
        ] {
            let expected = now + category.default_ttl().as_millis() as u64;
            assert!(cache.expires_at(key).unwrap().abs_diff(expected) < 5_000, "{}", key);
        }
        assert_eq!(cache.stats().sets, 5);
    }

    #[test]
    fn test_oversized_value_still_cached_in_memory() {
        let backend = MemoryBackend::new();
        let mut cache: CatalogCache<String> = CatalogCache::new(
            &Config {
                max_persist_bytes: 128,
                ..Config::default()
            },
            Some(Box::new(backend.clone())),
        );

        let big = "x".repeat(1024);
        assert_eq!(cache.set("big", big.clone(), None), PersistOutcome::SkippedTooLarge);
        assert_eq!(cache.get("big"), Some(big));
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn test_unavailable_storage_degrades_to_memory() {
        let backend = MemoryBackend::unavailable();
        let mut cache = cache_with(&backend, 10);

        assert_eq!(cache.set("k", s("v"), None), PersistOutcome::SkippedUnavailable);
        assert_eq!(cache.get("k"), Some(s("v")));

        cache.reset_memory_tier();
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_corrupt_persistent_record_is_a_miss() {
        let backend = MemoryBackend::new();
        backend.set_item("catalog_cache:k", "garbage").unwrap();
        let mut cache = cache_with(&backend, 10);

        assert_eq!(cache.get("k"), None);
        assert_eq!(backend.get_item("catalog_cache:k").unwrap(), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_sweep_expired() {
        let backend = MemoryBackend::new();
        let mut cache = cache_with(&backend, 10);

        cache.set("short", s("1"), Some(Duration::from_millis(50)));
        cache.set("long", s("2"), Some(Duration::from_secs(60)));
        sleep(Duration::from_millis(80));

        let report = cache.sweep_expired();
        assert_eq!(
            report,
            SweepReport {
                memory_removed: 1,
                persistent_removed: 1,
            }
        );
        assert_eq!(report.total(), 2);
        assert!(!cache.contains_in_memory("short"));
        assert_eq!(cache.get("long"), Some(s("2")));
    }
}
