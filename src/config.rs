//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Default per-group byte budget (64 MiB).
pub const DEFAULT_CACHE_BYTES: u64 = 64 * 1024 * 1024;

/// Default number of virtual replicas per node on the placement ring.
pub const DEFAULT_RING_REPLICAS: usize = 50;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Byte budget for each group's cache (0 = unbounded)
    pub cache_bytes: u64,
    /// Virtual replicas generated for every node added to the ring
    pub ring_replicas: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BYTES` - Per-group byte budget, 0 disables eviction (default: 64 MiB)
    /// - `RING_REPLICAS` - Virtual replicas per node (default: 50)
    pub fn from_env() -> Self {
        Self {
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_BYTES),
            ring_replicas: env::var("RING_REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RING_REPLICAS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_bytes: DEFAULT_CACHE_BYTES,
            ring_replicas: DEFAULT_RING_REPLICAS,
        }
    }
}
