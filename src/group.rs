//! Named Cache Groups
//!
//! A [`Group`] is a cache namespace: it binds a name, a [`Loader`], and one
//! thread-safe cache instance. Lookups first consult the cache; on a miss
//! the loader produces the source value, which is wrapped in a
//! [`ByteView`] and stored before being returned.
//!
//! A [`Registry`] owns the mapping from names to groups. It is an ordinary
//! value rather than process-global state: whichever component needs to
//! resolve names holds (or is handed) the registry.
//!
//! # Loaders
//!
//! A loader is a single-method capability. Any closure of the right shape
//! qualifies, as does a stateful object:
//!
//! ```
//! use loadcache::{BoxedError, Loader, Registry};
//!
//! struct Database;
//!
//! impl Loader for Database {
//!     fn load(&self, key: &str) -> Result<Vec<u8>, BoxedError> {
//!         Ok(key.as_bytes().to_vec())
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.add_group("db", 1024, Database).unwrap();
//! registry
//!     .add_group("echo", 1024, |key: &str| -> Result<Vec<u8>, BoxedError> {
//!         Ok(key.as_bytes().to_vec())
//!     })
//!     .unwrap();
//! ```
//!
//! # Concurrency
//!
//! The loader runs **outside** the cache lock; the lock is held only for
//! the initial probe and the final populate. Two concurrent misses on the
//! same key may therefore both invoke the loader. The cache does not
//! deduplicate identical in-flight loads; if a load is expensive enough to
//! warrant it, coalesce requests in the loader itself.

extern crate alloc;

use crate::config::CacheConfig;
use crate::concurrent::ConcurrentCache;
use crate::error::{BoxedError, Error, Result};
use crate::metrics::CacheMetrics;
use crate::view::ByteView;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use parking_lot::RwLock;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
extern crate std;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// The capability invoked on a cache miss to produce the source value for
/// a key.
///
/// Implemented by any `Fn(&str) -> Result<Vec<u8>, BoxedError>` closure as
/// well as by stateful objects. The cache never retries or falls back on
/// its own: whatever the loader returns, value or error, is what the caller
/// sees.
pub trait Loader: Send + Sync {
    /// Produces the value for `key`, or the error to surface to the caller.
    fn load(&self, key: &str) -> core::result::Result<Vec<u8>, BoxedError>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> core::result::Result<Vec<u8>, BoxedError> + Send + Sync,
{
    fn load(&self, key: &str) -> core::result::Result<Vec<u8>, BoxedError> {
        self(key)
    }
}

/// A named cache namespace binding a loader to a thread-safe cache.
///
/// Created through [`Registry::add_group`], or directly with
/// [`Group::new`] when no registry is involved.
pub struct Group {
    name: String,
    loader: Box<dyn Loader>,
    cache: ConcurrentCache<ByteView>,
}

impl Group {
    /// Creates a group with the given name, byte budget, and loader.
    ///
    /// The name must be non-empty: a group is addressed by its name, and an
    /// unaddressable namespace is a programming error worth rejecting at
    /// construction.
    pub fn new(
        name: impl Into<String>,
        max_bytes: u64,
        loader: impl Loader + 'static,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::Config("group name must not be empty".to_string()));
        }
        Ok(Group {
            name,
            loader: Box::new(loader),
            cache: ConcurrentCache::init(CacheConfig { max_bytes }, None),
        })
    }

    /// Returns the group's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches the value for `key`.
    ///
    /// An empty key is a benign no-op returning an empty view, not an
    /// error. Otherwise a cached value is returned on a hit; on a miss the
    /// loader is invoked, its bytes are wrapped and cached, and the view is
    /// returned. Loader errors propagate verbatim and nothing is cached for
    /// the key.
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Ok(ByteView::empty());
        }

        if let Some(view) = self.cache.get(key) {
            tracing::trace!(group = %self.name, key, "cache hit");
            return Ok(view);
        }

        self.load(key)
    }

    /// Loads `key` from the source of truth and populates the cache.
    ///
    /// Runs outside the cache lock, so a slow loader never blocks hits on
    /// other keys.
    fn load(&self, key: &str) -> Result<ByteView> {
        tracing::debug!(group = %self.name, key, "cache miss, invoking loader");
        let bytes = self.loader.load(key).map_err(Error::Load)?;
        let view = ByteView::from(bytes);
        self.cache.record_miss(view.len() as u64);
        self.cache.add(key.to_string(), view.clone());
        Ok(view)
    }

    /// Returns the bytes currently charged against the group's budget.
    pub fn used_bytes(&self) -> u64 {
        self.cache.used_bytes()
    }

    /// Returns the number of values currently cached in this group.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if the group's cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl CacheMetrics for Group {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.cache.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl core::fmt::Debug for Group {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

/// An owned mapping from namespace names to [`Group`] instances.
///
/// Groups are registered once and never removed; lookups hand out shared
/// handles. The registry's lock is never held while a loader runs.
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry {
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a group and registers it under its name.
    ///
    /// Rejects empty names and names that are already registered: handles
    /// to a registered group stay live indefinitely, so silently replacing
    /// the slot would strand them under a stale name.
    pub fn add_group(
        &self,
        name: &str,
        max_bytes: u64,
        loader: impl Loader + 'static,
    ) -> Result<Arc<Group>> {
        let group = Arc::new(Group::new(name, max_bytes, loader)?);
        let mut groups = self.groups.write();
        if groups.contains_key(name) {
            return Err(Error::Config(format!("group {name:?} already registered")));
        }
        groups.insert(name.to_string(), Arc::clone(&group));
        Ok(group)
    }

    /// Returns the group registered under `name`, if any.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns the number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Returns `true` if no groups are registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("groups", &self.groups.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn echo_loader(key: &str) -> core::result::Result<Vec<u8>, BoxedError> {
        Ok(key.as_bytes().to_vec())
    }

    #[test]
    fn test_closure_as_loader() {
        let group = Group::new("echo", 1024, echo_loader).unwrap();
        let view = group.get("hello").unwrap();
        assert_eq!(view.to_string_lossy(), "hello");
    }

    #[test]
    fn test_struct_as_loader() {
        struct Fixed;
        impl Loader for Fixed {
            fn load(&self, _key: &str) -> core::result::Result<Vec<u8>, BoxedError> {
                Ok(vec![42])
            }
        }

        let group = Group::new("fixed", 1024, Fixed).unwrap();
        assert_eq!(group.get("anything").unwrap().to_vec(), vec![42]);
    }

    #[test]
    fn test_empty_key_is_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let group = Group::new("noop", 1024, move |key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            echo_loader(key)
        })
        .unwrap();

        let view = group.get("").unwrap();
        assert!(view.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(group.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Group::new("", 1024, echo_loader).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_registry_round_trip() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let group = registry.add_group("scores", 1024, echo_loader).unwrap();
        assert_eq!(group.name(), "scores");
        assert_eq!(registry.len(), 1);

        let found = registry.get_group("scores").unwrap();
        assert_eq!(found.name(), "scores");
        assert!(registry.get_group("unknown").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let registry = Registry::new();
        registry.add_group("dup", 1024, echo_loader).unwrap();
        let err = registry.add_group("dup", 1024, echo_loader).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(registry.len(), 1);
    }
}
