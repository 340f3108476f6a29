//! LRU Cache Module
//!
//! Byte-budgeted cache with least-recently-used replacement.
//!
//! Entries live in a dense arena and are linked into a doubly linked recency
//! list by slot index:
//! - Head = Most recently used
//! - Tail = Least recently used
//!
//! A `HashMap<String, usize>` maps each key to its slot, so `get`, `add` and
//! `remove_oldest` are all O(1).

use std::collections::HashMap;
use std::fmt;

// == Value ==
/// Anything that can report its own size in bytes may be cached.
pub trait Value {
    /// Number of bytes this value occupies.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Callback invoked once for every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

fn entry_size<V: Value>(key: &str, value: &V) -> u64 {
    (key.len() + value.len()) as u64
}

// == LRU Cache ==
/// LRU cache bounded by the approximate byte size of its entries.
///
/// The size of an entry is `key.len() + value.len()`. A `max_bytes` of zero
/// disables eviction entirely and the cache grows without bound.
pub struct LruCache<V: Value> {
    /// Byte budget, 0 = unbounded
    max_bytes: u64,
    /// Sum of entry sizes currently resident
    nbytes: u64,
    /// Dense node storage; list links are indices into this vector
    slots: Vec<Node<V>>,
    /// Key to slot index
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            nbytes: 0,
            slots: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            on_evicted: None,
        }
    }

    /// Registers a callback fired with the key and value of each evicted entry.
    ///
    /// The callback runs synchronously inside `add`/`remove_oldest` and must
    /// not call back into this cache.
    pub fn on_evicted<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(callback));
        self
    }

    // == Get ==
    /// Looks up a key and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.move_to_front(id);
        Some(&self.slots[id].value)
    }

    /// Looks up a key without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&id| &self.slots[id].value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts from the LRU end until the
    /// cache fits its budget again.
    ///
    /// A single entry larger than the whole budget evicts everything,
    /// including itself.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&id) = self.index.get(&key) {
            self.move_to_front(id);
            let new_len = value.len() as u64;
            let old = std::mem::replace(&mut self.slots[id].value, value);
            self.nbytes = self.nbytes - old.len() as u64 + new_len;
        } else {
            self.nbytes += entry_size(&key, &value);
            let id = self.slots.len();
            self.slots.push(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.attach_front(id);
            self.index.insert(key, id);
        }

        // One oversized insert may need several evictions
        while self.max_bytes != 0 && self.nbytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any.
    ///
    /// Fires the eviction callback and hands the evicted entry back.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let id = self.tail?;
        let node = self.unlink(id);
        self.index.remove(&node.key);
        self.nbytes -= entry_size(&node.key, &node.value);

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    // == Remove ==
    /// Removes a key outright. This is not an eviction and does not fire the
    /// eviction callback.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let id = self.index.remove(key)?;
        let node = self.unlink(id);
        self.nbytes -= entry_size(&node.key, &node.value);
        Some(node.value)
    }

    // == Accessors ==
    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current value of the capacity counter.
    pub fn bytes(&self) -> u64 {
        self.nbytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cache: self,
            cursor: self.head,
        }
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    // == List Maintenance ==
    fn detach(&mut self, id: usize) {
        let (prev, next) = (self.slots[id].prev, self.slots[id].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[id].prev = None;
        self.slots[id].next = None;
    }

    fn attach_front(&mut self, id: usize) {
        self.slots[id].prev = None;
        self.slots[id].next = self.head;
        match self.head {
            Some(h) => self.slots[h].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn move_to_front(&mut self, id: usize) {
        if self.head == Some(id) {
            return;
        }
        self.detach(id);
        self.attach_front(id);
    }

    /// Detaches and frees a slot. The last slot is swapped into the hole, so
    /// its neighbours and index entry are repointed at `id`.
    fn unlink(&mut self, id: usize) -> Node<V> {
        self.detach(id);
        let node = self.slots.swap_remove(id);

        if id < self.slots.len() {
            let (prev, next) = (self.slots[id].prev, self.slots[id].next);
            match prev {
                Some(p) => self.slots[p].next = Some(id),
                None => self.head = Some(id),
            }
            match next {
                Some(n) => self.slots[n].prev = Some(id),
                None => self.tail = Some(id),
            }
            if let Some(slot) = self.index.get_mut(&self.slots[id].key) {
                *slot = id;
            }
        }
        node
    }
}

impl<V: Value> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("nbytes", &self.nbytes)
            .field("len", &self.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

// == Iterator ==
/// MRU-to-LRU iterator over `(key, value)` pairs.
pub struct Iter<'a, V: Value> {
    cache: &'a LruCache<V>,
    cursor: Option<usize>,
}

impl<'a, V: Value> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.cache.slots[self.cursor?];
        self.cursor = node.next;
        Some((node.key.as_str(), &node.value))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn test_lru_new() {
        let lru: LruCache<String> = LruCache::new(0);
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.bytes(), 0);
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut lru = LruCache::new(0);
        lru.add("key1", s("1234"));

        assert_eq!(lru.get("key1"), Some(&s("1234")));
        assert_eq!(lru.get("key2"), None);
    }

    #[test]
    fn test_empty_key_is_allowed() {
        let mut lru = LruCache::new(0);
        lru.add("", s("v"));

        assert_eq!(lru.get(""), Some(&s("v")));
        assert_eq!(lru.bytes(), 1);
    }

    #[test]
    fn test_remove_oldest_evicts_lru_entry() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = (s("value1"), s("value2"), s("v3"));
        let cap = (k1.len() + k2.len() + v1.len() + v2.len()) as u64;

        let mut lru = LruCache::new(cap);
        lru.add(k1, v1);
        lru.add(k2, v2);
        lru.add(k3, v3);

        assert!(lru.get("key1").is_none());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_on_evicted_fires_once_per_entry() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);

        let mut lru = LruCache::new(10).on_evicted(move |key, _value: &String| {
            sink.lock().unwrap().push(key.to_string());
        });
        lru.add("key1", s("123456"));
        lru.add("k2", s("k2"));
        lru.add("k3", s("k3"));
        lru.add("k4", s("k4"));

        assert_eq!(*evicted.lock().unwrap(), vec![s("key1"), s("k2")]);
    }

    #[test]
    fn test_get_promotes_to_mru() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);

        // Each entry is 1 + 4 bytes; the budget holds two
        let mut lru = LruCache::new(10).on_evicted(move |key, value: &String| {
            sink.lock().unwrap().push((key.to_string(), value.clone()));
        });
        lru.add("a", s("aaaa"));
        lru.add("b", s("bbbb"));

        assert_eq!(lru.get("a"), Some(&s("aaaa")));
        assert_eq!(lru.keys().next(), Some("a"));

        lru.add("c", s("cccc"));

        assert_eq!(*evicted.lock().unwrap(), vec![(s("b"), s("bbbb"))]);
        assert_eq!(lru.len(), 2);
        assert!(lru.contains("a"));
        assert!(lru.contains("c"));
    }

    #[test]
    fn test_readd_replaces_value_and_adjusts_bytes() {
        let mut lru = LruCache::new(0);
        lru.add("a", s("1234"));
        lru.add("b", s("12"));
        assert_eq!(lru.bytes(), 5 + 3);

        lru.add("a", s("1"));
        assert_eq!(lru.len(), 2);
        assert_eq!(lru.bytes(), 2 + 3);
        assert_eq!(lru.peek("a"), Some(&s("1")));
        // Re-insertion also promotes
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_oversized_entry_evicts_everything() {
        let mut lru = LruCache::new(8);
        lru.add("a", s("12"));
        lru.add("b", s("12"));
        lru.add("huge", s("0123456789"));

        assert!(lru.is_empty());
        assert_eq!(lru.bytes(), 0);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut lru = LruCache::new(0);
        for i in 0..1000 {
            lru.add(format!("key{i}"), s("some value"));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_remove_oldest_on_empty_is_noop() {
        let mut lru: LruCache<String> = LruCache::new(0);
        assert!(lru.remove_oldest().is_none());
        assert_eq!(lru.bytes(), 0);
    }

    #[test]
    fn test_remove_oldest_returns_entry() {
        let mut lru = LruCache::new(0);
        lru.add("a", s("1"));
        lru.add("b", s("2"));

        assert_eq!(lru.remove_oldest(), Some((s("a"), s("1"))));
        assert_eq!(lru.bytes(), 2);
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_remove_does_not_fire_callback() {
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        let mut lru = LruCache::new(0).on_evicted(move |_, _: &String| {
            *counter.lock().unwrap() += 1;
        });
        lru.add("a", s("1"));
        lru.add("b", s("2"));
        lru.add("c", s("3"));

        assert_eq!(lru.remove("b"), Some(s("2")));
        assert_eq!(lru.remove("b"), None);
        assert_eq!(*fired.lock().unwrap(), 0);
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["c", "a"]);
        assert_eq!(lru.bytes(), 4);
    }

    #[test]
    fn test_order_survives_slot_compaction() {
        let mut lru = LruCache::new(0);
        for key in ["a", "b", "c", "d", "e"] {
            lru.add(key, s("x"));
        }
        // Remove from the middle and the head so the last slot moves twice
        lru.remove("c");
        lru.remove("e");
        lru.get("a");

        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["a", "d", "b"]);
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some(s("b")));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some(s("d")));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some(s("a")));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_byte_values() {
        let mut lru = LruCache::new(0);
        lru.add("blob", vec![0u8; 16]);
        assert_eq!(lru.bytes(), 20);
        assert_eq!(lru.get("blob").map(|v| v.len()), Some(16));
    }
}
