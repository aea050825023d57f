//! In-process storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{item_size, StorageBackend, StorageError};

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, String>,
    used_bytes: usize,
    quota_bytes: Option<usize>,
    disabled: bool,
}

// == Memory Backend ==
/// Shared in-process key-value map.
///
/// Clones share the same data, so two caches built on clones of one backend
/// behave like two page loads of the same client.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    /// Unbounded backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend rejecting writes that would push the total past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let backend = Self::new();
        if let Ok(mut inner) = backend.inner.lock() {
            inner.quota_bytes = Some(quota_bytes);
        }
        backend
    }

    /// Backend that reports `Unavailable` for every call.
    pub fn unavailable() -> Self {
        let backend = Self::new();
        backend.set_available(false);
        backend
    }

    /// Switches the medium on or off at runtime.
    pub fn set_available(&self, available: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.disabled = !available;
        }
    }

    /// Bytes currently stored (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().map(|inner| inner.used_bytes).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))?;
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(inner)
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;

        let replaced = inner
            .items
            .get(key)
            .map(|old| item_size(key, old))
            .unwrap_or(0);
        let needed = item_size(key, value);
        let used_after = inner.used_bytes - replaced + needed;

        if let Some(quota) = inner.quota_bytes {
            if used_after > quota {
                return Err(StorageError::QuotaExceeded {
                    needed,
                    available: quota.saturating_sub(inner.used_bytes - replaced),
                });
            }
        }

        inner.items.insert(key.to_string(), value.to_string());
        inner.used_bytes = used_after;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if let Some(old) = inner.items.remove(key) {
            inner.used_bytes -= item_size(key, &old);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.items.keys().cloned().collect())
    }
}
