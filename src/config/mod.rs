//! Cache Configuration Module
//!
//! Configuration structs have public fields for simple instantiation, plus
//! checked conversions for capacities that arrive as signed integers (command
//! line flags, config files, FFI).
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used |
//!
//! # Examples
//!
//! ```
//! use arena_lru::config::LruCacheConfig;
//! use arena_lru::LruCache;
//!
//! let config = LruCacheConfig { capacity: 1000 };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! assert_eq!(cache.cap(), 1000);
//! ```

pub mod lru;

pub use lru::LruCacheConfig;
