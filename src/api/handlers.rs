//! API Handlers
//!
//! HTTP request handlers for the cache inspection endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{CatalogCache, StatsSnapshot, SweepReport};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
};
use crate::storage::{FileBackend, MemoryBackend, StorageBackend};

/// Longest key the API accepts, in bytes.
pub const MAX_KEY_LENGTH: usize = 256;

/// Cache of JSON payloads shared by handlers and the sweeper.
pub type SharedCache = Arc<RwLock<CatalogCache<Value>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
}

impl AppState {
    pub fn new(cache: CatalogCache<Value>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Builds the cache from configuration.
    ///
    /// With `storage_path` set the persistent tier is file-backed; otherwise
    /// it lives in process memory. A storage file that cannot be opened
    /// leaves the cache memory-only.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend: Option<Box<dyn StorageBackend>> = match &config.storage_path {
            Some(path) => match FileBackend::open(path, config.storage_quota_bytes) {
                Ok(file) => Some(Box::new(file)),
                Err(e) => {
                    warn!(
                        "Cache storage at {} unavailable, persistence disabled: {}",
                        path.display(),
                        e
                    );
                    None
                }
            },
            None => Some(Box::new(MemoryBackend::with_quota(config.storage_quota_bytes))),
        };
        Ok(Self::new(CatalogCache::new(config, backend)))
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Handler for PUT /cache/:key
///
/// `category` picks that category's TTL; `ttl_ms` sets one explicitly;
/// neither uses the configured default.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    validate_key(&key)?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    let outcome = match req.category {
        Some(category) => cache.set_category(category, &key, req.value),
        None => cache.set(&key, req.value, req.ttl_ms.map(Duration::from_millis)),
    };

    Ok(Json(SetResponse::new(key, &outcome)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: reads update recency and counters.
    let mut cache = state.cache.write().await;
    let value = cache
        .get_with_stats(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/:key. Succeeds whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    validate_key(&key)?;
    state.cache.write().await.delete(&key);

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.write().await.clear();
    Json(ClearResponse::cleared())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /sweep, an on-demand expiry sweep.
pub async fn sweep_handler(State(state): State<AppState>) -> Json<SweepReport> {
    let report = state.cache.write().await.sweep_expired();
    info!(
        "Manual sweep removed {} memory entries, {} persistent records",
        report.memory_removed, report.persistent_removed
    );
    Json(report)
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let persistence = state.cache.read().await.persistence_enabled();
    Json(HealthResponse::healthy(persistence))
}
