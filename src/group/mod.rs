//! Group Module
//!
//! Named cache namespaces, their loaders, and the registry that holds them.

mod loader;
mod namespace;
mod registry;

// Re-export public types
pub use loader::Loader;
pub use namespace::Group;
pub use registry::GroupRegistry;
