//! Group Module
//!
//! A named cache namespace that fills itself from a [`Loader`] on miss.

use std::fmt;

use tracing::debug;

use crate::cache::{ByteView, CacheStore};
use crate::error::{CacheError, Result};
use crate::group::Loader;

// == Group ==
/// A cache namespace: its own byte-budgeted store plus the loader that
/// populates it.
pub struct Group {
    name: String,
    loader: Box<dyn Loader>,
    main_cache: CacheStore,
}

impl Group {
    // == Constructor ==
    /// Creates a group with an explicit byte budget (0 = unbounded).
    ///
    /// # Arguments
    /// * `name` - Namespace name
    /// * `cache_bytes` - Byte budget for the group's cache
    /// * `loader` - Called with the key on every cache miss
    pub fn new(name: impl Into<String>, cache_bytes: u64, loader: impl Loader + 'static) -> Self {
        Self {
            name: name.into(),
            loader: Box::new(loader),
            main_cache: CacheStore::new(cache_bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group's local cache.
    pub fn cache(&self) -> &CacheStore {
        &self.main_cache
    }

    // == Get ==
    /// Returns the value for `key`, loading and caching it on a miss.
    ///
    /// # Errors
    /// - `InvalidRequest` if `key` is empty
    /// - `Load` if the loader fails; nothing is cached in that case
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("key is required".to_string()));
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!("[{}] cache hit for {:?}", self.name, key);
            return Ok(value);
        }

        debug!("[{}] cache miss for {:?}", self.name, key);
        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        self.get_locally(key)
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self
            .loader
            .load(key)
            .map_err(|source| CacheError::load(key, source))?;

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .finish_non_exhaustive()
    }
}
