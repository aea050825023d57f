//! Storage Backends Module
//!
//! The host key-value medium the persistent tier writes through. Backends
//! know nothing about cache entries; they store opaque strings.

mod file;
mod memory;

use thiserror::Error;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Default total quota for a backend, matching a typical browser origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

// == Storage Error ==
/// Failures reported by a storage medium.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The medium is missing or disabled in this environment
    #[error("storage unavailable")]
    Unavailable,

    /// Writing would exceed the medium's total quota
    #[error("quota exceeded: needed {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// Underlying I/O or format failure
    #[error("storage I/O error: {0}")]
    Io(String),
}

// == Storage Backend ==
/// A string key-value store shared with the rest of the host application.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Every stored key, including keys owned by other parts of the host.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Bytes a key-value pair counts against a quota.
pub(crate) fn item_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
