//! Group Registry Module
//!
//! Name-to-group lookup owned by whoever owns the node.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::group::{Group, Loader};

// == Group Registry ==
/// Registry of named groups.
///
/// Passed by reference to whoever needs it; lookups share a read lock and
/// registration takes the write lock.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a group, replacing any group of the same name.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: u64,
        loader: impl Loader + 'static,
    ) -> Arc<Group> {
        let group = Arc::new(Group::new(name, cache_bytes, loader));
        self.insert(Arc::clone(&group));
        group
    }

    /// Registers an already constructed group.
    pub fn insert(&self, group: Arc<Group>) {
        let name = group.name().to_string();
        let previous = self.groups.write().insert(name.clone(), group);
        if previous.is_some() {
            warn!("Group {:?} re-registered; previous cache dropped", name);
        } else {
            info!("Group {:?} registered", name);
        }
    }

    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Unregisters a group. Holders of its `Arc` keep a working group.
    pub fn remove_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.write().remove(name)
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}
