#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     LruCache<K, V, S>                     │
//! │  get / peek / put / evict / pop_lru / resize / iter       │
//! ├────────────────────────────┬─────────────────────────────┤
//! │      KeyIndex<K, S>        │     RecencyList<(K, V)>     │
//! │  key ──► NodeHandle        │  arena ring, sentinel at 0  │
//! │  insert / lookup / erase   │  push / move / remove / pop │
//! └────────────────────────────┴─────────────────────────────┘
//! ```
//!
//! | Operation | Complexity | Touches recency |
//! |-----------|------------|-----------------|
//! | `get`, `get_mut` | O(1) | yes |
//! | `peek`, `contains`, `peek_lru` | O(1) | no |
//! | `put` | O(1) | yes |
//! | `evict`, `pop_lru` | O(1) | n/a |
//! | `resize` | O(evicted) | n/a |
//! | `iter`, `iter_mut` | O(n) | no |
//!
//! ## Errors
//!
//! Misses are `None`. [`error::CacheError`] is reserved for rejected
//! construction (negative capacity), key-index misuse and failed invariant
//! checks.
//!
//! ```rust
//! use arena_lru::LruCache;
//! use arena_lru::error::CacheError;
//!
//! assert_eq!(
//!     LruCache::<String, u32>::try_new(-2).unwrap_err(),
//!     CacheError::InvalidCapacity(-2)
//! );
//! ```
//!
//! ## Capacity zero
//!
//! ```rust
//! use arena_lru::LruCache;
//!
//! let mut cache = LruCache::new(0);
//! assert_eq!(cache.put("k", 1), Some(("k", 1)));
//! assert!(cache.is_empty());
//! assert_eq!(cache.get(&"k"), None);
//! ```
//!
//! ## Logging
//!
//! The cache emits `tracing` events: `trace` for each eviction, `debug` for
//! `resize` and `clear`, `warn` if the index and the ring ever disagree. Install
//! any subscriber to see them.

#![no_std]

#[cfg(any(test, feature = "std", not(feature = "hashbrown")))]
extern crate std;

extern crate alloc;

/// Error types.
pub mod error;

/// Arena-backed doubly linked recency ring.
///
/// Key-agnostic building block of the cache: keeps values in recency order and
/// relocates them in O(1) given a [`list::NodeHandle`].
pub mod list;

/// Hash index from key to recency-ring handle.
pub mod index;

/// Cache configuration structures.
pub mod config;

/// Least Recently Used (LRU) cache implementation.
pub mod lru;

/// Cache metrics.
pub mod metrics;

pub use config::LruCacheConfig;
pub use error::CacheError;
pub use lru::LruCache;
pub use metrics::CacheMetrics;
