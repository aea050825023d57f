//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::storage::DEFAULT_QUOTA_BYTES;

/// Cache and server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries in the memory tier
    pub max_entries: usize,
    /// TTL for `set` calls without an explicit TTL
    pub default_ttl: Duration,
    /// Largest encoded entry the persistent tier will store, in bytes
    pub max_persist_bytes: usize,
    /// Namespace prefix for persisted keys
    pub key_prefix: String,
    /// Interval between expiry sweeps
    pub sweep_interval: Duration,
    /// File for the persistent tier; `None` keeps it in process memory
    pub storage_path: Option<PathBuf>,
    /// Total quota of the persistent medium, in bytes
    pub storage_quota_bytes: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Memory tier capacity (default: 500)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 900000)
    /// - `CACHE_MAX_PERSIST_BYTES` - Persistent entry ceiling (default: 51200)
    /// - `CACHE_KEY_PREFIX` - Persistent namespace (default: `catalog_cache:`)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 300)
    /// - `CACHE_STORAGE_PATH` - Storage file (default: unset, in-memory)
    /// - `CACHE_STORAGE_QUOTA_BYTES` - Storage quota (default: 5 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("CACHE_DEFAULT_TTL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.default_ttl),
            max_persist_bytes: parse_var("CACHE_MAX_PERSIST_BYTES")
                .unwrap_or(defaults.max_persist_bytes),
            key_prefix: env::var("CACHE_KEY_PREFIX")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.key_prefix),
            sweep_interval: parse_var("CACHE_SWEEP_INTERVAL_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            storage_path: env::var_os("CACHE_STORAGE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            storage_quota_bytes: parse_var("CACHE_STORAGE_QUOTA_BYTES")
                .unwrap_or(defaults.storage_quota_bytes),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 500,
            default_ttl: Duration::from_secs(15 * 60),
            max_persist_bytes: 50 * 1024,
            key_prefix: "catalog_cache:".to_string(),
            sweep_interval: Duration::from_secs(5 * 60),
            storage_path: None,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
