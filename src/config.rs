//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::DEFAULT_PREFIX;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace prepended to every cache key in storage
    pub cache_prefix: String,
    /// HTTP server port
    pub server_port: u16,
    /// JSON storage document; in-memory storage when unset
    pub storage_path: Option<PathBuf>,
    /// Seconds between cache status log lines, 0 disables them
    pub status_interval: u64,
    /// Default listing page size
    pub page_size: u32,
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PREFIX` - Cache key namespace (default: `filter_cache_`)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORAGE_PATH` - Storage document path (default: unset, in-memory)
    /// - `STATUS_INTERVAL` - Status log frequency in seconds (default: 60)
    /// - `PAGE_SIZE` - Default listing page size (default: 20)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_prefix: env::var("CACHE_PREFIX")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.cache_prefix),
            server_port: parse_env("SERVER_PORT", defaults.server_port),
            storage_path: env::var_os("STORAGE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            status_interval: parse_env("STATUS_INTERVAL", defaults.status_interval),
            page_size: parse_env("PAGE_SIZE", defaults.page_size).max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_prefix: DEFAULT_PREFIX.to_string(),
            server_port: 3000,
            storage_path: None,
            status_interval: 60,
            page_size: 20,
        }
    }
}
