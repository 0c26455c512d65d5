//! Configuration Module
//!
//! Handles loading the backend selector and connection parameters from
//! environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::cache::DurableCacheConfig;

// == Config Error ==
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown cache backend {0:?} (expected \"memory\" or \"durable\")")]
    UnknownBackend(String),
    #[error("invalid cache table {0:?} (must be non-empty and contain no ':')")]
    InvalidTable(String),
}

// == Backend Kind ==
/// Which cache backend to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Process-local map
    #[default]
    Memory,
    /// Redis-backed record store
    Durable,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            "durable" | "redis" => Ok(BackendKind::Durable),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => f.write_str("memory"),
            BackendKind::Durable => f.write_str("durable"),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache backend selector
    pub backend: BackendKind,
    /// Durable table / namespace name
    pub table: String,
    /// Durable store endpoint
    pub redis_url: String,
    /// Provenance tag written on durable records
    pub source: String,
    /// TTL in seconds applied to fresh origin results
    pub default_ttl: i64,
    /// Per-operation timeout for the durable store, in milliseconds
    pub op_timeout_ms: u64,
    /// In-memory sweeper interval in seconds, 0 disables it
    pub cleanup_interval: u64,
    /// Places API key
    pub places_api_key: String,
    /// Places API base URL
    pub places_base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory` or `durable` (default: memory)
    /// - `CACHE_TABLE` - Durable table name (default: places_cache)
    /// - `REDIS_URL` - Durable store endpoint (default: redis://127.0.0.1:6379/)
    /// - `CACHE_SOURCE` - Provenance tag (default: google-places)
    /// - `CACHE_TTL` - TTL in seconds (default: 3600)
    /// - `CACHE_OP_TIMEOUT_MS` - Durable operation timeout (default: 500)
    /// - `CLEANUP_INTERVAL` - Sweeper frequency in seconds (default: 60)
    /// - `PLACES_API_KEY` - Places API key (default: empty)
    /// - `PLACES_BASE_URL` - Places API base URL
    ///
    /// Unparsable numbers fall back to their default, as does a non-positive
    /// `CACHE_TTL`. An unknown backend name or a table name containing `:` is
    /// an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        let table = match env::var("CACHE_TABLE") {
            Ok(value) => validate_table(value)?,
            Err(_) => defaults.table,
        };

        Ok(Self {
            backend,
            table,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            source: env::var("CACHE_SOURCE").unwrap_or(defaults.source),
            default_ttl: ttl_or_default(
                env::var("CACHE_TTL").ok().as_deref(),
                defaults.default_ttl,
            ),
            op_timeout_ms: env::var("CACHE_OP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.op_timeout_ms),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            places_api_key: env::var("PLACES_API_KEY").unwrap_or(defaults.places_api_key),
            places_base_url: env::var("PLACES_BASE_URL").unwrap_or(defaults.places_base_url),
        })
    }

    /// Durable backend settings derived from this config.
    pub fn durable(&self) -> DurableCacheConfig {
        DurableCacheConfig {
            table: self.table.clone(),
            source: self.source.clone(),
            op_timeout: Duration::from_millis(self.op_timeout_ms),
        }
    }
}

// == Validation ==
/// Table names become the prefix of `{table}:{cacheKey}` store keys, so a
/// `:` in the table would let two tables address the same record.
fn validate_table(table: String) -> Result<String, ConfigError> {
    if table.is_empty() || table.contains(':') {
        return Err(ConfigError::InvalidTable(table));
    }
    Ok(table)
}

/// Parse a TTL in seconds; unparsable or non-positive values use `default`.
fn ttl_or_default(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(ttl) if ttl > 0 => ttl,
        Ok(ttl) => {
            warn!("CACHE_TTL={} is not positive, using default of {}s", ttl, default);
            default
        }
        Err(e) => {
            warn!("CACHE_TTL={:?} is not a number ({}), using default of {}s", raw, e, default);
            default
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            table: "places_cache".to_string(),
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            source: "google-places".to_string(),
            default_ttl: 3600,
            op_timeout_ms: 500,
            cleanup_interval: 60,
            places_api_key: String::new(),
            places_base_url: "https://maps.googleapis.com/maps/api".to_string(),
        }
    }
}
