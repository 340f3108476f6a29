//! Cache Store Module
//!
//! Thread-safe wrapper that serializes every call into the LRU cache.

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, LruCache};

// == Cache Store ==
/// Mutex-guarded LRU cache of [`ByteView`] values.
///
/// The lock is held for the whole call, including any evictions cascading
/// out of `add`. An eviction callback must therefore not re-enter the store.
#[derive(Debug)]
pub struct CacheStore {
    inner: Mutex<LruCache<ByteView>>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with the given byte budget (0 = unbounded).
    pub fn new(cache_bytes: u64) -> Self {
        Self::from_lru(LruCache::new(cache_bytes))
    }

    /// Creates a store that reports every eviction to `callback`.
    pub fn with_eviction_callback<F>(cache_bytes: u64, callback: F) -> Self
    where
        F: FnMut(&str, &ByteView) + Send + 'static,
    {
        Self::from_lru(LruCache::new(cache_bytes).on_evicted(callback))
    }

    fn from_lru(lru: LruCache<ByteView>) -> Self {
        Self {
            inner: Mutex::new(lru),
        }
    }

    // == Get ==
    /// Returns a clone of the cached value and promotes it to most recent.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.inner.lock().get(key).cloned()
    }

    // == Add ==
    /// Inserts or replaces a value, evicting as needed.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut lru = self.inner.lock();
        let expected = lru.len() + usize::from(!lru.contains(key));
        lru.add(key, value);

        let evicted = expected - lru.len();
        if evicted > 0 {
            debug!(
                "Evicted {} entries while adding {:?} ({} of {} bytes used)",
                evicted,
                key,
                lru.bytes(),
                lru.max_bytes()
            );
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&self) -> Option<(String, ByteView)> {
        self.inner.lock().remove_oldest()
    }

    // == Accessors ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Bytes currently accounted to resident entries.
    pub fn bytes(&self) -> u64 {
        self.inner.lock().bytes()
    }

    pub fn max_bytes(&self) -> u64 {
        self.inner.lock().max_bytes()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_bytes(), 100);
    }

    #[test]
    fn test_store_add_and_get() {
        let store = CacheStore::new(0);

        store.add("key1", ByteView::from("value1"));

        assert_eq!(store.get("key1"), Some(ByteView::from("value1")));
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.bytes(), 10);
    }

    #[test]
    fn test_store_evicts_by_bytes() {
        let store = CacheStore::new(10);

        store.add("a", ByteView::from("aaaa"));
        store.add("b", ByteView::from("bbbb"));
        store.get("a");
        store.add("c", ByteView::from("cccc"));

        assert_eq!(store.len(), 2);
        assert!(store.get("b").is_none());
        assert!(store.get("a").is_some());
    }

    #[test]
    fn test_store_eviction_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let store = CacheStore::with_eviction_callback(5, move |key, value| {
            sink.lock().push((key.to_string(), value.to_string()));
        });

        store.add("a", ByteView::from("1234"));
        store.add("b", ByteView::from("5678"));

        assert_eq!(
            *evicted.lock(),
            vec![("a".to_string(), "1234".to_string())]
        );
    }

    #[test]
    fn test_store_remove_oldest() {
        let store = CacheStore::new(0);
        store.add("a", ByteView::from("1"));
        store.add("b", ByteView::from("2"));

        let (key, value) = store.remove_oldest().unwrap();
        assert_eq!(key, "a");
        assert_eq!(value.to_string(), "1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_concurrent_adds_respect_budget() {
        let store = Arc::new(CacheStore::new(1024));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..200 {
                        store.add(&format!("t{t}-k{i}"), ByteView::from("0123456789"));
                        store.get(&format!("t{t}-k{}", i / 2));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.bytes() <= 1024);
        assert!(!store.is_empty());
    }
}
