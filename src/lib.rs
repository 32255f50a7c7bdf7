#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Layered Design
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            Registry                              │
//! │   name ──▶ Group ("scores"), Group ("info"), Group ("courses")   │
//! │                              │                                   │
//! │          ┌───────────────────┤                                   │
//! │          ▼                   ▼                                   │
//! │   ┌────────────┐     ┌───────────────────┐                       │
//! │   │   Loader   │     │  ConcurrentCache  │   one Mutex,          │
//! │   │ (on miss)  │     │  ┌─────────────┐  │   lazily built        │
//! │   └────────────┘     │  │  LruCache   │  │                       │
//! │                      │  └─────────────┘  │                       │
//! │                      └───────────────────┘                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup enters the [`Group`], which queries the [`ConcurrentCache`]; on
//! a hit the stored [`ByteView`] is returned. On a miss the [`Loader`] is
//! invoked (outside the cache lock), the result is wrapped and inserted,
//! and the insert may trigger one or more evictions in the [`LruCache`].
//!
//! ## Using the eviction core directly
//!
//! ```rust
//! use loadcache::{CacheConfig, LruCache};
//!
//! let mut cache: LruCache<String> = LruCache::init(CacheConfig { max_bytes: 8 }, None);
//! cache.add("k1".to_string(), "v1".to_string());
//! cache.add("k2".to_string(), "v2".to_string());
//! cache.get("k1");                                // "k1" becomes most recently used
//! cache.add("k3".to_string(), "v3".to_string());  // "k2" evicted (least recently used)
//! assert!(cache.get("k2").is_none());
//! assert!(cache.used_bytes() <= 8);
//! ```
//!
//! ## Using groups
//!
//! ```rust
//! # #[cfg(feature = "concurrent")] {
//! use loadcache::{BoxedError, CacheMetrics, Registry};
//!
//! let registry = Registry::new();
//! let scores = registry
//!     .add_group("scores", 2 << 10, |key: &str| -> Result<Vec<u8>, BoxedError> {
//!         Ok(format!("score for {key}").into_bytes())
//!     })
//!     .unwrap();
//!
//! let view = scores.get("Tom").unwrap();          // loader invoked
//! let view = scores.get("Tom").unwrap();          // served from cache
//! assert_eq!(view.to_string_lossy(), "score for Tom");
//! assert_eq!(scores.metrics().get("cache_hits"), Some(&1.0));
//! # }
//! ```

#![no_std]

#[cfg(test)]
extern crate scoped_threadpool;

/// Immutable value wrapper.
///
/// Provides [`ByteView`], the read-only wrapper around cached payloads, and
/// the [`ByteSized`] capability the eviction structure charges its byte
/// budget against.
pub mod view;

/// Doubly linked recency list.
///
/// **Note**: internal infrastructure. It exposes raw pointer operations
/// that require careful invariant maintenance; use the high-level cache
/// types instead.
pub(crate) mod list;

/// Cache configuration structures.
pub mod config;

/// Byte-budgeted LRU cache implementation.
///
/// The eviction core: single-threaded by contract, bounded by a byte budget
/// rather than an entry count.
pub mod lru;

/// Cache error taxonomy.
pub mod error;

/// Cache metrics system.
///
/// Hit/miss/eviction counters and byte accounting, reported in
/// deterministic order.
pub mod metrics;

/// Thread-safe cache wrapper.
///
/// Serializes all access to one LRU structure behind a single lock and
/// builds the structure lazily on first use.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

/// Named cache groups and the registry that tracks them.
///
/// Binds a name, a loader, and a cache instance; on a miss the loader
/// produces the value that is cached and returned.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod group;

// Re-export the cache types
pub use config::CacheConfig;
pub use lru::{EvictionListener, LruCache};
pub use view::{ByteSized, ByteView};

// Re-export the error types
pub use error::{BoxedError, Error, Result};

// Re-export the metrics interface
pub use metrics::{CacheMetrics, CoreCacheMetrics};

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentCache;
#[cfg(feature = "concurrent")]
pub use group::{Group, Loader, Registry};
