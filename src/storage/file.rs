//! File-backed storage.
//!
//! The whole map lives in one JSON document that is rewritten atomically
//! (temp file + rename) on every mutation.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::{item_size, StorageBackend, StorageError};

#[derive(Debug, Default)]
struct State {
    items: HashMap<String, String>,
    used_bytes: usize,
}

// == File Backend ==
/// Durable key-value store surviving process restarts.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    quota_bytes: usize,
    state: Mutex<State>,
}

impl FileBackend {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable document is discarded
    /// with a warning, since everything in it is a disposable cache record.
    pub fn open(path: impl Into<PathBuf>, quota_bytes: usize) -> Result<Self, StorageError> {
        let path = path.into();
        let items = load(&path)?;
        let used_bytes = items.iter().map(|(k, v)| item_size(k, v)).sum();

        debug!(
            "Opened file storage at {} ({} items, {} bytes)",
            path.display(),
            items.len(),
            used_bytes
        );

        Ok(Self {
            path,
            quota_bytes,
            state: Mutex::new(State { items, used_bytes }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Io("storage lock poisoned".to_string()))
    }

    fn flush(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        let body = serde_json::to_vec(items).map_err(|e| StorageError::Io(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).map_err(io_error)?;
        fs::rename(&tmp, &self.path).map_err(io_error)
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;

        let replaced = state
            .items
            .get(key)
            .map(|old| item_size(key, old))
            .unwrap_or(0);
        let needed = item_size(key, value);
        let used_after = state.used_bytes - replaced + needed;

        if used_after > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                needed,
                available: self.quota_bytes.saturating_sub(state.used_bytes - replaced),
            });
        }

        let previous = state.items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&state.items) {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => state.items.insert(key.to_string(), old),
                None => state.items.remove(key),
            };
            return Err(e);
        }
        state.used_bytes = used_after;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let Some(old) = state.items.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&state.items) {
            state.items.insert(key.to_string(), old);
            return Err(e);
        }
        state.used_bytes -= item_size(key, &old);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.items.keys().cloned().collect())
    }
}

fn load(path: &Path) -> Result<HashMap<String, String>, StorageError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(io_error(e)),
    };

    match serde_json::from_slice(&raw) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!("Discarding unreadable storage file {}: {}", path.display(), e);
            Ok(HashMap::new())
        }
    }
}

fn io_error(e: std::io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}
