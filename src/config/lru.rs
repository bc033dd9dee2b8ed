//! Configuration for the Least Recently Used (LRU) cache.
//!
//! # Capacity
//!
//! `capacity` is the maximum number of entries. Zero is allowed: such a cache
//! never retains anything, every `put` hands its entry straight back as evicted.
//!
//! Capacities are `usize`, so a negative capacity cannot be expressed directly.
//! When the value comes from a signed source, convert it with
//! `LruCacheConfig::try_from`, which rejects negatives with
//! [`CacheError::InvalidCapacity`].
//!
//! ```
//! use arena_lru::config::LruCacheConfig;
//! use arena_lru::error::CacheError;
//!
//! assert_eq!(LruCacheConfig::try_from(16).unwrap().capacity, 16);
//! assert_eq!(
//!     LruCacheConfig::try_from(-3).unwrap_err(),
//!     CacheError::InvalidCapacity(-3)
//! );
//! ```

use crate::error::CacheError;
use core::fmt;

/// Configuration for an LRU (Least Recently Used) cache.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a configuration for a cache holding at most `capacity` entries.
    #[inline]
    pub const fn new(capacity: usize) -> Self {
        LruCacheConfig { capacity }
    }

    /// Returns the configured capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl TryFrom<i64> for LruCacheConfig {
    type Error = CacheError;

    fn try_from(capacity: i64) -> Result<Self, Self::Error> {
        usize::try_from(capacity)
            .map(LruCacheConfig::new)
            .map_err(|_| CacheError::InvalidCapacity(capacity))
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
