//! Shared Ring Module
//!
//! Read-mostly, lock-guarded access to a [`HashRing`].

use parking_lot::RwLock;

use crate::ring::HashRing;

// == Shared Ring ==
/// A [`HashRing`] behind a read/write lock.
///
/// Lookups share the read lock and run concurrently; adding or removing
/// nodes takes the write lock for the duration of the append and re-sort.
#[derive(Debug)]
pub struct SharedRing {
    inner: RwLock<HashRing>,
}

impl SharedRing {
    pub fn new(ring: HashRing) -> Self {
        Self {
            inner: RwLock::new(ring),
        }
    }

    /// Registers nodes on the ring.
    pub fn add_nodes<I, S>(&self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.write().add_nodes(nodes);
    }

    /// Removes a node's points. Returns false if it owned none.
    pub fn remove_node(&self, node: &str) -> bool {
        self.inner.write().remove_node(node)
    }

    /// Returns the node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).map(str::to_string)
    }

    pub fn nodes(&self) -> Vec<String> {
        self.inner
            .read()
            .nodes()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.inner.read().contains_node(node)
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl From<HashRing> for SharedRing {
    fn from(ring: HashRing) -> Self {
        Self::new(ring)
    }
}
