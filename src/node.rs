//! Cache Node Module
//!
//! Routes a key to its owning node and serves locally owned keys from the
//! node's groups. Moving bytes between nodes is left to the caller.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::ByteView;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry, Loader};
use crate::ring::{HashRing, SharedRing};

// == Route ==
/// Outcome of a lookup on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// This node owns the key; here is the value
    Local(ByteView),
    /// Another node owns the key
    Remote(String),
}

// == Cache Node ==
/// One member of the cache cluster.
///
/// The node registers itself on its placement ring at construction, so a
/// fresh node with no peers owns every key.
#[derive(Debug)]
pub struct CacheNode {
    id: String,
    config: Config,
    ring: SharedRing,
    groups: GroupRegistry,
}

impl CacheNode {
    // == Constructor ==
    /// Creates a node with the default CRC-32 ring.
    pub fn new(id: impl Into<String>, config: Config) -> Self {
        let ring = HashRing::new(config.ring_replicas);
        Self::with_ring(id, config, ring)
    }

    /// Creates a node around a caller-supplied ring (e.g. a custom hash).
    pub fn with_ring(id: impl Into<String>, config: Config, mut ring: HashRing) -> Self {
        let id = id.into();
        ring.add_nodes([&id]);
        info!(
            "Node {:?} started: cache_bytes={}, ring_replicas={}",
            id,
            config.cache_bytes,
            ring.replicas()
        );

        Self {
            id,
            config,
            ring: SharedRing::new(ring),
            groups: GroupRegistry::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ring(&self) -> &SharedRing {
        &self.ring
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    // == Membership ==
    /// Adds peer nodes to the ring. Peers already present are skipped.
    pub fn add_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fresh: Vec<String> = peers
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !self.ring.contains_node(p))
            .collect();
        if fresh.is_empty() {
            return;
        }
        info!("Node {:?} adding peers {:?}", self.id, fresh);
        self.ring.add_nodes(&fresh);
    }

    /// Removes a peer from the ring. The local node cannot be removed.
    pub fn remove_peer(&self, peer: &str) -> bool {
        if peer == self.id {
            return false;
        }
        let removed = self.ring.remove_node(peer);
        if removed {
            info!("Node {:?} removed peer {:?}", self.id, peer);
        }
        removed
    }

    // == Groups ==
    /// Creates and registers a group using the configured byte budget.
    pub fn new_group(&self, name: impl Into<String>, loader: impl Loader + 'static) -> Arc<Group> {
        self.groups.new_group(name, self.config.cache_bytes, loader)
    }

    // == Routing ==
    /// Returns the id of the node owning `key`.
    pub fn owner(&self, key: &str) -> Option<String> {
        self.ring.get(key)
    }

    pub fn is_local(&self, key: &str) -> bool {
        self.owner(key).map_or(true, |owner| owner == self.id)
    }

    /// Looks up `key` in `group`.
    ///
    /// Keys owned by this node are served (and loaded on miss) by the group.
    /// Keys owned elsewhere are returned as [`Route::Remote`] untouched.
    ///
    /// # Errors
    /// - `InvalidRequest` for an empty key
    /// - `GroupNotFound` if no such group is registered
    /// - `Load` if the group's loader fails
    pub fn get(&self, group: &str, key: &str) -> Result<Route> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("key is required".to_string()));
        }
        let group = self
            .groups
            .get_group(group)
            .ok_or_else(|| CacheError::GroupNotFound(group.to_string()))?;

        match self.owner(key) {
            Some(owner) if owner != self.id => {
                debug!("[{}] {:?} owned by {:?}", group.name(), key, owner);
                Ok(Route::Remote(owner))
            }
            _ => group.get(key).map(Route::Local),
        }
    }
}
