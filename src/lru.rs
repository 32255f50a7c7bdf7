//! Byte-Budgeted LRU Cache Implementation
//!
//! This module provides the eviction core: a string-keyed cache bounded by a
//! **byte budget** rather than an entry count, with O(1) lookup, insertion,
//! and eviction. Entries are ordered by recency of use and the least
//! recently used entries are evicted when the budget is exceeded.
//!
//! # Algorithm
//!
//! Every entry costs `key length + value length` bytes against the budget.
//! Both reads and writes move an entry to the most-recently-used position:
//! a just-written key is not a good eviction candidate, so "used" includes
//! writes, not only reads. Eviction runs in a loop rather than a single
//! conditional because one oversized insert can require evicting several
//! small entries to get back under budget.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Add: O(1) amortized (an add may trigger several O(1) evictions)
//!   - RemoveOldest: O(1)
//!
//! - **Space Complexity**:
//!   - O(n) where n is the number of live entries
//!   - Bookkeeping overhead is roughly 64-128 bytes per entry beyond the
//!     budgeted key and value bytes
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe; exactly one logical owner may
//! operate on it at a time. For concurrent access use
//! [`ConcurrentCache`](crate::ConcurrentCache), which serializes every
//! operation behind a single lock.

extern crate alloc;

use crate::config::CacheConfig;
use crate::list::{List, Node};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::view::ByteSized;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
extern crate std;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Callback invoked with the owned `(key, value)` pair at the moment an
/// entry is evicted.
///
/// The callback runs synchronously inside the evicting operation, so it
/// must not re-enter the cache it was evicted from.
pub type EvictionListener<V> = Box<dyn FnMut(String, V) + Send>;

/// A byte-budgeted LRU cache.
///
/// Keys are strings; values are any type reporting a byte length through
/// [`ByteSized`]. When the sum of `key length + value length` over all live
/// entries exceeds the configured budget, least recently used entries are
/// evicted until the cache is back under budget. A budget of `0` disables
/// eviction.
///
/// # Examples
///
/// ```
/// use loadcache::{CacheConfig, LruCache};
///
/// let mut cache: LruCache<String> = LruCache::init(CacheConfig { max_bytes: 0 }, None);
///
/// cache.add("key1".to_string(), "1234".to_string());
/// assert_eq!(cache.get("key1"), Some(&"1234".to_string()));
/// assert_eq!(cache.get("key2"), None);
/// assert_eq!(cache.used_bytes(), 8);
/// ```
pub struct LruCache<V> {
    config: CacheConfig,
    list: List<(String, V)>,
    map: HashMap<String, *mut Node<(String, V)>>,
    used_bytes: u64,
    metrics: CoreCacheMetrics,
    on_evicted: Option<EvictionListener<V>>,
}

// SAFETY: LruCache owns all data and raw pointers point only to nodes owned
// by `list`; all mutation requires &mut self.
unsafe impl<V: Send> Send for LruCache<V> {}

impl<V: ByteSized> LruCache<V> {
    /// Creates a cache with the given byte budget and an optional eviction
    /// listener.
    pub fn init(config: CacheConfig, on_evicted: Option<EvictionListener<V>>) -> Self {
        LruCache {
            config,
            list: List::new(),
            map: HashMap::new(),
            used_bytes: 0,
            metrics: CoreCacheMetrics::new(config.max_bytes),
            on_evicted,
        }
    }

    /// Returns the configured byte budget; `0` means unbounded.
    #[inline]
    pub fn max_bytes(&self) -> u64 {
        self.config.max_bytes
    }

    /// Returns the sum of `key length + value length` over all live entries.
    #[inline]
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Returns the current entry count.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn entry_weight(key: &str, value: &V) -> u64 {
        (key.len() + value.byte_len()) as u64
    }

    /// Looks up a key, promoting it to the most-recently-used position on a
    /// hit. The promotion is a deliberate side effect of the read.
    ///
    /// A miss has no side effect; record it with
    /// [`record_miss`](Self::record_miss) once the object size is known.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        if let Some(&node) = self.map.get(key) {
            unsafe {
                // SAFETY: node pointers in the map always refer to live
                // nodes of `list`
                self.list.move_to_front(node);
                let (k, v) = (*node).value();
                self.metrics.record_hit(Self::entry_weight(k, v));
                Some(&(*node).value().1)
            }
        } else {
            None
        }
    }

    /// Records a cache miss of `object_size` bytes for metrics tracking.
    #[inline]
    pub fn record_miss(&mut self, object_size: u64) {
        self.metrics.record_miss(object_size);
    }

    /// Inserts a value under `key`, or updates the existing entry in place.
    ///
    /// Either way the entry ends up in the most-recently-used position and
    /// `used_bytes` is adjusted: by the size delta for an update (which can
    /// be negative), or by the full entry weight for an insert. Afterwards,
    /// least recently used entries are evicted until the cache is back
    /// under budget.
    ///
    /// An entry larger than the whole budget is inserted and then
    /// immediately evicted by the same call; the budget invariant holds
    /// again before `add` returns.
    pub fn add(&mut self, key: String, value: V) {
        if let Some(&node) = self.map.get(&key) {
            let new_len = value.byte_len() as u64;
            unsafe {
                // SAFETY: node pointers in the map always refer to live
                // nodes of `list`
                self.list.move_to_front(node);
                let (_, old_value) = self.list.replace(node, (key, value));
                let old_len = old_value.byte_len() as u64;
                self.used_bytes = self.used_bytes - old_len + new_len;
                self.metrics.record_size_change(old_len, new_len);
            }
        } else {
            let weight = Self::entry_weight(&key, &value);
            let node = self.list.push_front((key.clone(), value));
            self.map.insert(key, node);
            self.used_bytes += weight;
            self.metrics.record_insertion(weight);
        }

        while self.config.max_bytes != 0 && self.used_bytes > self.config.max_bytes {
            self.remove_oldest();
        }
    }

    /// Evicts the least recently used entry, if any exist.
    ///
    /// Removes the entry from both the key map and the recency ordering,
    /// decrements `used_bytes` by its weight, and invokes the eviction
    /// listener with the owned pair. No-op when the cache is empty.
    pub fn remove_oldest(&mut self) {
        if let Some(node) = self.list.pop_back() {
            // SAFETY: pop_back never returns a sigil node
            let (key, value) = unsafe { node.into_value() };
            self.map.remove(key.as_str());
            let weight = Self::entry_weight(&key, &value);
            self.used_bytes -= weight;
            self.metrics.record_eviction(weight);
            tracing::trace!(key = %key, bytes = weight, "evicted least recently used entry");
            if let Some(on_evicted) = self.on_evicted.as_mut() {
                on_evicted(key, value);
            }
        }
    }

    /// Removes all entries without invoking the eviction listener.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        self.used_bytes = 0;
        self.metrics.cache_size_bytes = 0;
    }
}

impl<V: ByteSized> CacheMetrics for LruCache<V> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<V> core::fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.config.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::view::ByteView;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use std::sync::{Arc, Mutex};

    fn make_cache(max_bytes: u64) -> LruCache<String> {
        LruCache::init(CacheConfig { max_bytes }, None)
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut cache = make_cache(0);
        cache.add("key1".to_string(), "1234".to_string());

        assert_eq!(cache.get("key1"), Some(&"1234".to_string()));
        assert_eq!(cache.get("key2"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), 8);
    }

    #[test]
    fn test_add_updates_existing_key() {
        let mut cache = make_cache(0);
        cache.add("key".to_string(), "short".to_string());
        cache.add("key".to_string(), "a much longer value".to_string());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), ("key".len() + "a much longer value".len()) as u64);
        assert_eq!(cache.get("key"), Some(&"a much longer value".to_string()));
    }

    #[test]
    fn test_update_can_shrink_used_bytes() {
        let mut cache = make_cache(0);
        cache.add("key".to_string(), "a much longer value".to_string());
        cache.add("key".to_string(), "v".to_string());

        assert_eq!(cache.used_bytes(), 4);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_removes_oldest() {
        // budget fits exactly two "kN" -> "vN" entries
        let mut cache = make_cache(8);
        cache.add("k1".to_string(), "v1".to_string());
        cache.add("k2".to_string(), "v2".to_string());
        cache.add("k3".to_string(), "v3".to_string());

        assert_eq!(cache.get("k1"), None);
        assert_eq!(cache.len(), 2);
        assert!(cache.used_bytes() <= 8);
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = make_cache(8);
        cache.add("k1".to_string(), "v1".to_string());
        cache.add("k2".to_string(), "v2".to_string());

        // touch k1 so k2 becomes the eviction victim
        assert!(cache.get("k1").is_some());
        cache.add("k3".to_string(), "v3".to_string());

        assert_eq!(cache.get("k2"), None);
        assert!(cache.get("k1").is_some());
        assert!(cache.get("k3").is_some());
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut cache = make_cache(0);
        for i in 0..1000 {
            cache.add(std::format!("key_{i}"), "x".repeat(64));
        }
        assert_eq!(cache.len(), 1000);
    }

    #[test]
    fn test_oversized_entry_is_reconciled() {
        let mut cache = make_cache(4);
        cache.add("key".to_string(), "far too large for the budget".to_string());

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.used_bytes(), 0);
        assert_eq!(cache.get("key"), None);
    }

    #[test]
    fn test_remove_oldest_on_empty_is_noop() {
        let mut cache = make_cache(16);
        cache.remove_oldest();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn test_eviction_listener_receives_pairs() {
        let evicted: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut cache: LruCache<String> = LruCache::init(
            CacheConfig { max_bytes: 8 },
            Some(Box::new(move |key, value| {
                sink.lock().unwrap().push((key, value));
            })),
        );

        cache.add("k1".to_string(), "v1".to_string());
        cache.add("k2".to_string(), "v2".to_string());
        cache.add("k3".to_string(), "v3".to_string());
        cache.add("k4".to_string(), "v4".to_string());

        let evicted = evicted.lock().unwrap();
        assert_eq!(
            &*evicted,
            &[
                ("k1".to_string(), "v1".to_string()),
                ("k2".to_string(), "v2".to_string()),
            ]
        );
    }

    #[test]
    fn test_clear() {
        let mut cache = make_cache(0);
        cache.add("a".to_string(), "1".to_string());
        cache.add("b".to_string(), "2".to_string());
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);

        cache.add("c".to_string(), "3".to_string());
        assert_eq!(cache.get("c"), Some(&"3".to_string()));
    }

    #[test]
    fn test_byteview_values() {
        let mut cache: LruCache<ByteView> =
            LruCache::init(CacheConfig { max_bytes: 0 }, None);
        cache.add("img".to_string(), ByteView::new(&[0u8; 16]));

        assert_eq!(cache.used_bytes(), 19);
        assert_eq!(cache.get("img").unwrap().len(), 16);
    }

    #[test]
    fn test_metrics() {
        let mut cache = make_cache(8);
        cache.add("k1".to_string(), "v1".to_string());
        cache.get("k1");
        cache.record_miss(4);
        cache.add("k2".to_string(), "v2".to_string());
        cache.add("k3".to_string(), "v3".to_string());

        let metrics = cache.metrics();
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("cache_misses"), Some(&1.0));
        assert_eq!(metrics.get("requests"), Some(&2.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(metrics.get("cache_size_bytes"), Some(&(cache.used_bytes() as f64)));
        assert_eq!(cache.algorithm_name(), "LRU");
    }
}
