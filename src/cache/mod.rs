//! Cache Module
//!
//! Two-tier catalog cache: a bounded LRU memory tier in front of a
//! best-effort persistent tier, with per-category TTLs.

mod category;
mod codec;
mod entry;
pub mod keys;
mod lru;
mod memory;
mod persistent;
mod stats;
mod store;


// Re-export public types
pub use category::CacheCategory;
pub use codec::{EntryCodec, JsonCodec};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use memory::MemoryTier;
pub use persistent::{PersistOutcome, PersistRead, PersistentTier};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{CatalogCache, SweepReport};
