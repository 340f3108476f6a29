//! Meshcache - the data-placement and memory core of a distributed cache node
//!
//! Provides a byte-budgeted LRU cache, a consistent-hash ring for choosing the
//! node that owns a key, and named groups that fill themselves from a loader.

pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod node;
pub mod ring;

pub use cache::{ByteView, CacheStore, LruCache, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Group, GroupRegistry, Loader};
pub use node::{CacheNode, Route};
pub use ring::{HashRing, SharedRing};
