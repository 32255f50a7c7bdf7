//! Cache Configuration
//!
//! Configuration for the byte-budgeted LRU cache. The config struct has all
//! public fields for simple instantiation:
//!
//! - **Simple**: just create the struct with the fields set
//! - **Type safety**: the budget must be provided at construction
//! - **No boilerplate**: no constructors or builder methods needed
//!
//! # Understanding `max_bytes`
//!
//! The budget bounds the sum of `key length + value length` over all live
//! entries, not the entry count. Entry bookkeeping (map slot, list node,
//! pointers) is not charged against the budget; expect roughly 64-128 bytes
//! of overhead per entry on top of `max_bytes`.
//!
//! A `max_bytes` of `0` is the explicit **unbounded** mode: eviction is
//! disabled entirely and the cache grows without limit.
//!
//! # Examples
//!
//! ```
//! use loadcache::{CacheConfig, LruCache};
//!
//! // 10MB budget for keys + values
//! let config = CacheConfig { max_bytes: 10 * 1024 * 1024 };
//! let cache: LruCache<String> = LruCache::init(config, None);
//!
//! // unbounded: eviction disabled
//! let config = CacheConfig { max_bytes: 0 };
//! let cache: LruCache<String> = LruCache::init(config, None);
//! ```

use core::fmt;

/// Configuration for a byte-budgeted LRU cache.
///
/// # Fields
///
/// - `max_bytes`: maximum total size in bytes of all live entries, where an
///   entry costs `key length + value length`. `0` disables eviction.
#[derive(Clone, Copy)]
pub struct CacheConfig {
    /// Maximum total size in bytes of keys plus values. `0` means unbounded.
    pub max_bytes: u64,
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = CacheConfig {
            max_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(config.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_config_unbounded() {
        let config = CacheConfig { max_bytes: 0 };
        assert_eq!(config.max_bytes, 0);
    }
}
