//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for group lookups and routing.
///
/// The eviction engine and the placement ring never fail; only the layers
/// that validate input or call out to a loader produce these.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid request data (e.g. an empty key)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No group registered under the given name
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// The backing loader failed to produce a value
    #[error("Failed to load key {key}: {source}")]
    Load {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl CacheError {
    /// Wraps a loader failure for `key`.
    pub fn load(key: &str, source: anyhow::Error) -> Self {
        CacheError::Load {
            key: key.to_string(),
            source: source.into(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
