//! Persistent Tier Module
//!
//! Best-effort, size-limited second-chance storage on top of a
//! [`StorageBackend`]. Nothing in here fails outward: every storage or codec
//! problem is turned into a skipped write or a miss.

use tracing::{debug, warn};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, EntryCodec};
use crate::storage::{StorageBackend, StorageError};

// == Outcomes ==
/// What happened to a persistent write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Stored,
    /// Encoded entry exceeded the per-entry ceiling
    SkippedTooLarge,
    /// No medium, or the medium is disabled
    SkippedUnavailable,
    /// Encoding failed or the medium rejected the write
    Failed(String),
}

impl PersistOutcome {
    /// Short snake_case label, used in logs and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistOutcome::Stored => "stored",
            PersistOutcome::SkippedTooLarge => "skipped_too_large",
            PersistOutcome::SkippedUnavailable => "skipped_unavailable",
            PersistOutcome::Failed(_) => "failed",
        }
    }
}

/// What a persistent read found.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistRead<V> {
    Hit(CacheEntry<V>),
    Missing,
    /// Stored but past its expiry; removed
    Expired,
    /// Stored but undecodable; removed
    Corrupt,
    Unavailable,
}

impl<V> PersistRead<V> {
    pub fn into_entry(self) -> Option<CacheEntry<V>> {
        match self {
            PersistRead::Hit(entry) => Some(entry),
            _ => None,
        }
    }
}

// == Persistent Tier ==
pub struct PersistentTier<V> {
    backend: Option<Box<dyn StorageBackend>>,
    codec: Box<dyn EntryCodec<V>>,
    prefix: String,
    max_entry_bytes: usize,
}

impl<V> PersistentTier<V> {
    /// `backend = None` models a host without any persistent medium.
    pub fn new(
        backend: Option<Box<dyn StorageBackend>>,
        codec: Box<dyn EntryCodec<V>>,
        prefix: impl Into<String>,
        max_entry_bytes: usize,
    ) -> Self {
        Self {
            backend,
            codec,
            prefix: prefix.into(),
            max_entry_bytes,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Set ==
    /// Writes `entry` under `key`.
    ///
    /// The size ceiling applies to the encoded string length in bytes.
    pub fn persist_set(&self, key: &str, entry: &CacheEntry<V>) -> PersistOutcome {
        let Some(backend) = &self.backend else {
            return PersistOutcome::SkippedUnavailable;
        };
        let storage_key = self.storage_key(key);

        let raw = match self.codec.encode(entry) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Skipping persistent write for '{}': {}", key, e);
                // An older record would otherwise outlive the newer value.
                self.remove_quietly(backend.as_ref(), &storage_key);
                return PersistOutcome::Failed(e.to_string());
            }
        };

        if raw.len() > self.max_entry_bytes {
            debug!(
                "Skipping persistent write for '{}': {} bytes exceeds ceiling of {}",
                key,
                raw.len(),
                self.max_entry_bytes
            );
            self.remove_quietly(backend.as_ref(), &storage_key);
            return PersistOutcome::SkippedTooLarge;
        }

        match backend.set_item(&storage_key, &raw) {
            Ok(()) => PersistOutcome::Stored,
            Err(StorageError::Unavailable) => PersistOutcome::SkippedUnavailable,
            Err(e) => {
                warn!("Persistent write for '{}' failed: {}", key, e);
                self.remove_quietly(backend.as_ref(), &storage_key);
                PersistOutcome::Failed(e.to_string())
            }
        }
    }

    // == Get ==
    /// Reads `key`, eagerly removing corrupt or expired records.
    pub fn persist_get(&self, key: &str) -> PersistRead<V> {
        let Some(backend) = &self.backend else {
            return PersistRead::Unavailable;
        };
        let storage_key = self.storage_key(key);

        let raw = match backend.get_item(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PersistRead::Missing,
            Err(StorageError::Unavailable) => return PersistRead::Unavailable,
            Err(e) => {
                warn!("Persistent read for '{}' failed: {}", key, e);
                return PersistRead::Unavailable;
            }
        };

        match self.codec.decode(&raw) {
            Ok(entry) if entry.is_expired() => {
                self.remove_quietly(backend.as_ref(), &storage_key);
                PersistRead::Expired
            }
            Ok(entry) => PersistRead::Hit(entry),
            Err(e) => {
                warn!("Dropping corrupt persistent record '{}': {}", key, e);
                self.remove_quietly(backend.as_ref(), &storage_key);
                PersistRead::Corrupt
            }
        }
    }

    // == Delete ==
    pub fn persist_delete(&self, key: &str) {
        if let Some(backend) = &self.backend {
            self.remove_quietly(backend.as_ref(), &self.storage_key(key));
        }
    }

    // == Clear ==
    /// Removes every record in the cache namespace, returning how many.
    /// Keys outside the namespace are never touched.
    pub fn persist_clear(&self) -> usize {
        let Some(backend) = &self.backend else {
            return 0;
        };

        self.namespaced_keys(backend.as_ref())
            .into_iter()
            .filter(|storage_key| backend.remove_item(storage_key).is_ok())
            .count()
    }

    // == Sweep ==
    /// Removes expired and undecodable records in the namespace.
    pub fn sweep(&self) -> usize {
        let Some(backend) = &self.backend else {
            return 0;
        };
        let now = current_timestamp_ms();
        let mut removed = 0;

        for storage_key in self.namespaced_keys(backend.as_ref()) {
            let stale = match backend.get_item(&storage_key) {
                Ok(Some(raw)) => match self.codec.decode(&raw) {
                    Ok(entry) => entry.is_expired_at(now),
                    Err(_) => true,
                },
                _ => false,
            };

            if stale && backend.remove_item(&storage_key).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    fn namespaced_keys(&self, backend: &dyn StorageBackend) -> Vec<String> {
        match backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.prefix))
                .collect(),
            Err(e) => {
                debug!("Cannot list persistent keys: {}", e);
                Vec::new()
            }
        }
    }

    fn remove_quietly(&self, backend: &dyn StorageBackend, storage_key: &str) {
        if let Err(e) = backend.remove_item(storage_key) {
            debug!("Persistent remove of '{}' failed: {}", storage_key, e);
        }
    }
}

impl<V> std::fmt::Debug for PersistentTier<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentTier")
            .field("enabled", &self.is_enabled())
            .field("prefix", &self.prefix)
            .field("max_entry_bytes", &self.max_entry_bytes)
            .finish()
    }
}
