//! Concurrency-Safe Cache Wrapper
//!
//! This module makes the single-threaded [`LruCache`](crate::LruCache) safe
//! for concurrent callers by serializing every operation behind one
//! `parking_lot::Mutex` scoped to the wrapper instance.
//!
//! # Why Mutex Instead of RwLock?
//!
//! LRU requires **mutable access even for read operations**: every `get()`
//! moves the accessed entry to the front of the recency list. Since a read
//! is inherently a write, `RwLock` would provide no benefit; every access
//! would still need the exclusive lock. `Mutex` has less bookkeeping and
//! makes it clear that all operations are mutually exclusive.
//!
//! # Why a Single Lock?
//!
//! Operations against one cache are linearizable: at most one logical
//! operation executes against the underlying structure at any instant, so a
//! concurrent `get` can never observe a half-applied `add`, and the LRU
//! ordering is global rather than an approximation. The underlying
//! operations are pure in-memory bookkeeping, so lock hold times are short
//! and bounded; anything slow (like a loader fetching a missing value)
//! belongs outside the lock.
//!
//! # Lazy Construction
//!
//! The backing structure is built on the first operation, under the same
//! lock that guards subsequent access, never at declaration time. Many
//! namespaces may be declared but never populated; those never pay for
//! their backing structures.

extern crate alloc;

use crate::config::CacheConfig;
use crate::lru::{EvictionListener, LruCache};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::view::ByteSized;
use alloc::collections::BTreeMap;
use alloc::string::String;
use parking_lot::Mutex;

struct Inner<V> {
    cache: Option<LruCache<V>>,
    /// Listener handed to the backing structure when it is first built.
    on_evicted: Option<EvictionListener<V>>,
}

/// A thread-safe, byte-budgeted LRU cache.
///
/// Wraps one [`LruCache`] behind a single mutual-exclusion lock; the
/// backing structure is constructed lazily on the first `get` or `add`.
/// `get` returns a clone of the value so the lock is released before the
/// caller touches it; value types are expected to clone cheaply (e.g.
/// [`ByteView`](crate::ByteView) bumps a reference count).
///
/// # Examples
///
/// ```
/// use loadcache::{CacheConfig, ConcurrentCache};
///
/// let cache: ConcurrentCache<String> =
///     ConcurrentCache::init(CacheConfig { max_bytes: 1024 }, None);
///
/// cache.add("key".to_string(), "value".to_string());
/// assert_eq!(cache.get("key"), Some("value".to_string()));
/// ```
pub struct ConcurrentCache<V> {
    config: CacheConfig,
    inner: Mutex<Inner<V>>,
}

impl<V: ByteSized + Clone> ConcurrentCache<V> {
    /// Creates a wrapper with the given byte budget and an optional
    /// eviction listener.
    ///
    /// No backing structure is allocated until the first operation.
    pub fn init(config: CacheConfig, on_evicted: Option<EvictionListener<V>>) -> Self {
        ConcurrentCache {
            config,
            inner: Mutex::new(Inner {
                cache: None,
                on_evicted,
            }),
        }
    }

    /// Runs `f` against the backing structure, constructing it first if
    /// this is the first operation ever performed on this wrapper.
    fn with_cache<R>(&self, f: impl FnOnce(&mut LruCache<V>) -> R) -> R {
        let mut inner = self.inner.lock();
        let Inner { cache, on_evicted } = &mut *inner;
        let cache = cache.get_or_insert_with(|| LruCache::init(self.config, on_evicted.take()));
        f(cache)
    }

    /// Looks up a key, returning a clone of the value on a hit.
    ///
    /// A hit promotes the entry to the most-recently-used position.
    pub fn get(&self, key: &str) -> Option<V> {
        self.with_cache(|cache| cache.get(key).cloned())
    }

    /// Inserts or updates a value, evicting least recently used entries as
    /// needed to stay under budget.
    pub fn add(&self, key: String, value: V) {
        self.with_cache(|cache| cache.add(key, value));
    }

    /// Records a cache miss for metrics tracking.
    ///
    /// Call this after a failed [`get`](Self::get) once the object has been
    /// fetched from the source and its size is known.
    pub fn record_miss(&self, object_size: u64) {
        self.with_cache(|cache| cache.record_miss(object_size));
    }

    /// Returns the current entry count (`0` if the backing structure has
    /// not been built yet).
    pub fn len(&self) -> usize {
        self.inner.lock().cache.as_ref().map_or(0, LruCache::len)
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().cache.as_ref().map_or(true, LruCache::is_empty)
    }

    /// Returns the bytes currently charged against the budget.
    pub fn used_bytes(&self) -> u64 {
        self.inner
            .lock()
            .cache
            .as_ref()
            .map_or(0, LruCache::used_bytes)
    }

    /// Returns the configured byte budget; `0` means unbounded.
    #[inline]
    pub fn max_bytes(&self) -> u64 {
        self.config.max_bytes
    }
}

impl<V: ByteSized + Clone> CacheMetrics for ConcurrentCache<V> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let inner = self.inner.lock();
        match inner.cache.as_ref() {
            Some(cache) => cache.metrics(),
            None => CoreCacheMetrics::new(self.config.max_bytes).to_btreemap(),
        }
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLRU"
    }
}

impl<V> core::fmt::Debug for ConcurrentCache<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentCache")
            .field("max_bytes", &self.config.max_bytes)
            .finish()
    }
}
