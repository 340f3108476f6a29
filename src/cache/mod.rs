//! Cache Module
//!
//! Byte-budgeted LRU eviction and the thread-safe store built on top of it.

mod byte_view;
mod lru;
mod store;


// Re-export public types
pub use byte_view::ByteView;
pub use lru::{EvictionCallback, Iter, LruCache, Value};
pub use store::CacheStore;
