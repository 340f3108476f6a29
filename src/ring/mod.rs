//! Ring Module
//!
//! Consistent-hash placement of keys onto cache nodes.

mod hash_ring;
mod shared;


// Re-export public types
pub use hash_ring::{crc32_ieee, HashFn, HashRing};
pub use shared::SharedRing;
