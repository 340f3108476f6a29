//! Hash Ring Module
//!
//! Consistent hashing of keys onto registered nodes, with virtual replicas.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

// == Hash Function ==
/// Hash used both for placing replicas and for looking up keys.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Standard CRC-32 (IEEE) checksum, the default ring hash.
pub fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// == Hash Ring ==
/// Consistent-hash ring mapping keys to node identifiers.
///
/// Every node contributes `replicas` points, each the hash of the replica
/// index followed by the node id (`"0node"`, `"1node"`, ...). A key belongs to
/// the first point at or after its own hash, wrapping past the largest point
/// back to the smallest.
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// All ring points, ascending
    points: Vec<u32>,
    /// Ring point to owning node
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring hashing with CRC-32.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32_ieee)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher<F>(replicas: usize, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        Self {
            hash: Arc::new(hash),
            replicas,
            points: Vec::new(),
            owners: HashMap::new(),
        }
    }

    fn replica_point(&self, index: usize, node: &str) -> u32 {
        (self.hash)(format!("{index}{node}").as_bytes())
    }

    // == Add Nodes ==
    /// Registers nodes, placing `replicas` points for each.
    ///
    /// Adding a node twice places its points twice; callers are expected not
    /// to register the same node again. When two nodes hash to the same point
    /// the later one takes it over.
    pub fn add_nodes<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let point = self.replica_point(i, node);
                self.points.push(point);
                if let Some(previous) = self.owners.insert(point, node.to_string()) {
                    if previous != node {
                        warn!(
                            "Ring point {} of node {:?} collides with node {:?}; reassigned",
                            point, node, previous
                        );
                    }
                }
            }
            debug!("Added node {:?} with {} replicas", node, self.replicas);
        }
        self.points.sort_unstable();
    }

    // == Remove Node ==
    /// Removes every ring point currently owned by `node`.
    ///
    /// Returns false if the node owned no points. Points the node lost to a
    /// collision stay with the node that took them over.
    pub fn remove_node(&mut self, node: &str) -> bool {
        let before = self.owners.len();
        self.owners.retain(|_, owner| owner.as_str() != node);
        if self.owners.len() == before {
            return false;
        }

        let owners = &self.owners;
        self.points.retain(|point| owners.contains_key(point));
        debug!("Removed node {:?} from ring", node);
        true
    }

    // == Get ==
    /// Returns the node owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&point| point < hash);
        // Past the largest point: wrap around to the first
        let point = self.points[idx % self.points.len()];
        self.owners.get(&point).map(String::as_str)
    }

    // == Accessors ==
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct node ids currently owning at least one point.
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.owners.values().map(String::as_str).collect()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.owners.values().any(|owner| owner == node)
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.points.len())
            .field("nodes", &self.nodes())
            .finish()
    }
}
