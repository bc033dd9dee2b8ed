//! Error types for the cache and its building blocks.
//!
//! Lookups that simply find nothing are not errors: [`LruCache::get`],
//! [`LruCache::peek`] and [`LruCache::evict`] report a miss as `None`.
//! [`CacheError`] covers the remaining cases:
//!
//! - [`CacheError::InvalidCapacity`]: a negative capacity was supplied at
//!   construction time. No cache is created.
//! - [`CacheError::KeyConflict`] / [`CacheError::KeyNotFound`]: returned by the
//!   [`KeyIndex`](crate::index::KeyIndex) when asked to insert a duplicate key or
//!   erase an absent one. The cache checks for hits before inserting, so seeing a
//!   conflict through the cache means the index and the recency list disagree.
//! - [`CacheError::Corrupted`]: reported by the `check_invariants`/`check_links`
//!   diagnostics.
//!
//! ```
//! use arena_lru::error::CacheError;
//! use arena_lru::LruCache;
//!
//! let err = LruCache::<u32, u32>::try_new(-1).unwrap_err();
//! assert_eq!(err, CacheError::InvalidCapacity(-1));
//! assert!(LruCache::<u32, u32>::try_new(0).is_ok());
//! ```
//!
//! [`LruCache::get`]: crate::LruCache::get
//! [`LruCache::peek`]: crate::LruCache::peek
//! [`LruCache::evict`]: crate::LruCache::evict

use core::fmt;

/// Errors produced by cache construction, the key index and invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// The requested capacity was negative.
    InvalidCapacity(i64),
    /// The key index already holds an entry for this key.
    KeyConflict,
    /// The key index holds no entry for this key.
    KeyNotFound,
    /// An internal structural invariant does not hold.
    Corrupted(&'static str),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InvalidCapacity(capacity) => {
                write!(f, "invalid capacity {capacity}: must be non-negative")
            }
            CacheError::KeyConflict => f.write_str("key already present in index"),
            CacheError::KeyNotFound => f.write_str("key not present in index"),
            CacheError::Corrupted(what) => write!(f, "cache invariant violated: {what}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CacheError {}
