//! Catalog Cache - two-tier cache for movie and TV catalog data
//!
//! A bounded LRU memory tier in front of a best-effort persistent tier, with
//! per-category TTLs, hit/miss statistics and a background expiry sweeper.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheCategory, CatalogCache, PersistOutcome, StatsSnapshot};
pub use config::Config;
pub use tasks::spawn_sweeper;
