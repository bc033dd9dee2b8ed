//! Least Recently Used (LRU) Cache Implementation
//!
//! A fixed-capacity key-value store that evicts the least recently touched entry
//! when a new key arrives and the cache is full. Lookup, insert, update,
//! promotion and removal are all O(1) (average, subject to hashing).
//!
//! # Structure
//!
//! ```text
//!   KeyIndex (hash map)            RecencyList (arena ring)
//!   ┌────────┬────────┐
//!   │ "c"    │ h3     │──────┐    sentinel ─► [h3: c] ─► [h1: a] ─► [h2: b] ─┐
//!   │ "a"    │ h1     │──┐   └──────────────────▲            ▲          ▲     │
//!   │ "b"    │ h2     │──┼──────────────────────┼────────────┘          │     │
//!   └────────┴────────┘  └──────────────────────┼───────────────────────┘     │
//!                                    MRU ───────┘                  LRU ◄──────┘
//! ```
//!
//! The index resolves a key to the [`NodeHandle`](crate::list::NodeHandle) of
//! its entry; the ring keeps a strict recency order, so there is always exactly
//! one eviction candidate at the back.
//!
//! - `get`: index lookup; on a hit the node moves to the front.
//! - `peek`: index lookup without moving anything.
//! - `put`: on a hit the value is replaced in place and the node moves to the
//!   front. On a miss with a full cache the back entry is evicted first, then the
//!   new entry is linked at the front.
//! - `evict`: explicit removal by key.
//!
//! # Capacity zero
//!
//! A cache with capacity 0 is valid. It never stores anything; `put` hands the
//! entry straight back as the evicted pair.
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe and does no internal locking. Callers
//! sharing a cache between threads must serialize every call themselves, for
//! example by wrapping it in a `Mutex`.

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::error::CacheError;
use crate::index::KeyIndex;
use crate::list::{self, RecencyList};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use tracing::{debug, trace, warn};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// Upper bound on the number of slots reserved up front; larger caches grow
/// on demand.
const MAX_PREALLOCATION: usize = 1 << 16;

/// An implementation of a Least Recently Used (LRU) cache.
///
/// # Examples
///
/// ```
/// use arena_lru::LruCache;
///
/// let mut cache = LruCache::new(2);
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Accessing items updates their recency
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond capacity evicts the least recently used item
/// assert_eq!(cache.put("cherry", 3), Some(("banana", 2)));
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: RecencyList<(K, V)>,
    index: KeyIndex<K, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a cache holding at most `cap` entries with the default hasher.
    pub fn new(cap: usize) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a cache from a signed capacity.
    ///
    /// Negative capacities are rejected with [`CacheError::InvalidCapacity`]
    /// and no cache is built.
    pub fn try_new(cap: i64) -> Result<LruCache<K, V, DefaultHashBuilder>, CacheError> {
        let config = LruCacheConfig::try_from(cap)?;
        Ok(LruCache::init(config, None))
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a cache holding at most `cap` entries, hashing keys with
    /// `hash_builder`.
    pub fn with_hasher(cap: usize, hash_builder: S) -> Self {
        let reserve = cap.min(MAX_PREALLOCATION);
        LruCache {
            config: LruCacheConfig::new(cap),
            list: RecencyList::with_capacity(reserve),
            index: KeyIndex::with_capacity_and_hasher(reserve, hash_builder),
            metrics: LruCacheMetrics::new(),
        }
    }

    /// Creates a cache from `config`. `None` uses a default-constructed hasher.
    pub fn init(config: LruCacheConfig, hash_builder: Option<S>) -> Self
    where
        S: Default,
    {
        Self::with_hasher(config.capacity, hash_builder.unwrap_or_default())
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn cap(&self) -> usize {
        self.config.capacity
    }

    /// Returns the number of entries currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the metrics collected so far.
    #[inline]
    pub fn lru_metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(handle) = self.index.lookup(key) else {
            self.metrics.core.record_miss();
            return None;
        };
        self.list.move_to_front(handle);
        self.metrics.core.record_hit();
        self.list.get(handle).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value for `key` and marks it most
    /// recently used.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(handle) = self.index.lookup(key) else {
            self.metrics.core.record_miss();
            return None;
        };
        self.list.move_to_front(handle);
        self.metrics.core.record_hit();
        self.list.get_mut(handle).map(|(_, v)| v)
    }

    /// Returns the value for `key` without touching recency order or metrics.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.index.lookup(key)?;
        self.list.get(handle).map(|(_, v)| v)
    }

    /// Returns the entry that the next capacity eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|(k, v)| (k, v))
    }

    /// Returns `true` if `key` is present. Does not touch recency order.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Removes `key` and returns its value, or `None` if it was not present.
    pub fn evict<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.index.erase(key).ok()?;
        let (_, value) = self.list.remove(handle)?;
        self.metrics.core.record_removal();
        trace!(len = self.list.len(), "evicted entry on request");
        Some(value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.unlink_lru()?;
        self.metrics.core.record_removal();
        Some(entry)
    }

    /// Changes the capacity, evicting least recently used entries until the
    /// cache fits. Returns how many entries were evicted.
    ///
    /// When the arena holds more than twice the new capacity in slots it is
    /// rebuilt at the live size, so shrinking a large cache returns its memory.
    pub fn resize(&mut self, cap: usize) -> usize {
        let old_cap = mem::replace(&mut self.config.capacity, cap);
        if cap < old_cap {
            self.metrics.record_shrink();
        }
        let mut evicted = 0;
        while self.list.len() > cap {
            if self.unlink_lru().is_none() {
                break;
            }
            self.metrics.core.record_eviction();
            evicted += 1;
        }
        if cap < old_cap && self.list.slot_count() > cap.saturating_mul(2) {
            self.compact();
        }
        debug!(old_cap, new_cap = cap, evicted, "resized cache");
        evicted
    }

    /// Removes every entry. Capacity and metrics are kept.
    ///
    /// Arena slots stay allocated for reuse; they never exceed one more than
    /// the capacity, and the cache is expected to refill.
    pub fn clear(&mut self) {
        debug!(len = self.list.len(), "clearing cache");
        self.index.clear();
        self.list.clear();
    }

    /// Iterates `(key, value)` pairs from most to least recently used without
    /// changing recency order. Use `.rev()` to start from the eviction end.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Iterates `(key, &mut value)` pairs from most to least recently used
    /// without changing recency order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.list.iter_mut(),
        }
    }

    /// Verifies the structural invariants: `len <= cap`, the recency ring is
    /// well formed, and every linked entry has exactly one index entry pointing
    /// back at it (and vice versa).
    pub fn check_invariants(&self) -> Result<(), CacheError> {
        if self.list.len() > self.config.capacity {
            return Err(CacheError::Corrupted("len exceeds capacity"));
        }
        self.list.check_links()?;
        if self.index.len() != self.list.len() {
            return Err(CacheError::Corrupted("index and ring sizes differ"));
        }
        for handle in self.list.handles() {
            let (key, _) = self
                .list
                .get(handle)
                .ok_or(CacheError::Corrupted("ring yielded a dead handle"))?;
            if self.index.lookup(key) != Some(handle) {
                return Err(CacheError::Corrupted("index does not point at ring entry"));
            }
        }
        Ok(())
    }

    /// Rebuilds the ring at its live size and repoints the index.
    fn compact(&mut self) {
        let slots = self.list.slot_count();
        let index = &mut self.index;
        let mut stale = 0usize;
        self.list.compact(|(key, _), handle| {
            if !index.repoint(key, handle) {
                stale += 1;
            }
        });
        if stale > 0 {
            warn!(stale, "ring entries without index entry during compaction");
        }
        self.index.shrink_to(self.list.len());
        debug!(from = slots, to = self.list.slot_count(), "compacted arena");
    }

    /// Detaches the back entry from both the ring and the index.
    fn unlink_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_back()?;
        if self.index.erase(&key).is_err() {
            warn!("evicted entry had no index entry");
        }
        Some((key, value))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts or updates `key`.
    ///
    /// - If `key` is present its value is replaced in place, the entry becomes
    ///   most recently used and `Some((key, old_value))` is returned.
    /// - Otherwise the new entry is stored at the front and, if that took the
    ///   cache over capacity, the least recently used entry is evicted and
    ///   returned.
    /// - With capacity 0 nothing is stored and `Some((key, value))` is returned.
    ///
    /// The new entry is indexed before anything is evicted. If the index
    /// refuses the key, the entry is handed back as `Some((key, value))` and
    /// the cache is left exactly as it was.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(handle) = self.index.lookup(&key) {
            self.list.move_to_front(handle);
            self.metrics.core.record_update();
            let (_, slot) = self.list.get_mut(handle)?;
            let old = mem::replace(slot, value);
            return Some((key, old));
        }

        if self.config.capacity == 0 {
            self.metrics.core.record_eviction();
            trace!("capacity is zero, entry evicted on arrival");
            return Some((key, value));
        }

        let handle = self.list.push_front((key.clone(), value));
        if self.index.insert(key, handle).is_err() {
            warn!("key index already held the key being inserted");
            return self.list.remove(handle);
        }
        self.metrics.core.record_insertion();

        if self.list.len() <= self.config.capacity {
            return None;
        }
        let evicted = self.unlink_lru();
        if evicted.is_some() {
            self.metrics.core.record_eviction();
            trace!(cap = self.config.capacity, "evicted least recently used entry");
        }
        evicted
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a mut LruCache<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

/// Iterator over the entries of an [`LruCache`], most recently used first.
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

/// Mutable iterator over the entries of an [`LruCache`], most recently used
/// first.
pub struct IterMut<'a, K, V> {
    inner: list::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (&*k, v))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn keys<K: Clone + Hash + Eq, V, S: BuildHasher>(cache: &LruCache<K, V, S>) -> Vec<K> {
        cache.iter().map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn test_lru_get_put() {
        let mut cache = LruCache::new(2);
        assert_eq!(cache.put("apple", 1), None);
        assert_eq!(cache.put("banana", 2), None);
        assert_eq!(cache.get(&"apple"), Some(&1));
        assert_eq!(cache.get(&"banana"), Some(&2));
        assert_eq!(cache.get(&"cherry"), None);
        assert_eq!(cache.put("apple", 3).unwrap().1, 1);
        assert_eq!(cache.get(&"apple"), Some(&3));
        assert_eq!(cache.put("cherry", 4).unwrap().1, 2);
        assert_eq!(cache.get(&"banana"), None);
        assert_eq!(cache.get(&"apple"), Some(&3));
        assert_eq!(cache.get(&"cherry"), Some(&4));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_get_mut() {
        let mut cache = LruCache::new(2);
        cache.put("apple", 1);
        cache.put("banana", 2);
        if let Some(v) = cache.get_mut(&"apple") {
            *v = 3;
        }
        assert_eq!(cache.get(&"apple"), Some(&3));
        cache.put("cherry", 4);
        assert_eq!(cache.get(&"banana"), None);
        assert_eq!(cache.get(&"apple"), Some(&3));
        assert_eq!(cache.get(&"cherry"), Some(&4));
    }

    #[test]
    fn test_lru_evict() {
        let mut cache = LruCache::new(2);
        cache.put("apple", 1);
        cache.put("banana", 2);
        assert_eq!(cache.evict(&"apple"), Some(1));
        assert_eq!(cache.get(&"apple"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.evict(&"cherry"), None);
        let evicted = cache.put("cherry", 3);
        assert_eq!(evicted, None);
        assert_eq!(cache.get(&"banana"), Some(&2));
        assert_eq!(cache.get(&"cherry"), Some(&3));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_evict_absent_key_changes_nothing() {
        let mut cache = LruCache::new(3);
        cache.put(1, "one");
        cache.put(2, "two");
        let before = keys(&cache);
        assert_eq!(cache.evict(&9), None);
        assert_eq!(keys(&cache), before);
        assert_eq!(cache.lru_metrics().core.removals, 0);
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = LruCache::new(2);
        cache.put("apple", 1);
        cache.put("banana", 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        cache.put("cherry", 3);
        assert_eq!(cache.get(&"cherry"), Some(&3));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_string_keys() {
        let mut cache = LruCache::new(2);
        let key1 = String::from("apple");
        let key2 = String::from("banana");
        cache.put(key1.clone(), 1);
        cache.put(key2.clone(), 2);
        assert_eq!(cache.get(&key1), Some(&1));
        assert_eq!(cache.get("apple"), Some(&1));
        assert_eq!(cache.peek("banana"), Some(&2));
        assert!(cache.contains("banana"));
        assert_eq!(cache.evict("banana"), Some(2));
    }

    #[test]
    fn test_lru_peek_does_not_promote() {
        let mut cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        for _ in 0..3 {
            assert_eq!(cache.peek(&"a"), Some(&1));
        }
        assert_eq!(cache.put("c", 3), Some(("a", 1)));
        assert_eq!(cache.lru_metrics().core.requests, 0);
    }

    #[test]
    fn test_lru_peek_lru_and_pop_lru() {
        let mut cache = LruCache::new(3);
        assert_eq!(cache.peek_lru(), None);
        assert_eq!(cache.pop_lru(), None);
        cache.put(1, 'a');
        cache.put(2, 'b');
        cache.put(3, 'c');
        cache.get(&1);
        assert_eq!(cache.peek_lru(), Some((&2, &'b')));
        assert_eq!(cache.pop_lru(), Some((2, 'b')));
        assert_eq!(cache.peek_lru(), Some((&3, &'c')));
        assert!(!cache.contains(&2));
        assert_eq!(cache.len(), 2);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_zero_capacity() {
        let mut cache = LruCache::new(0);
        assert_eq!(cache.put("a", 1), Some(("a", 1)));
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.lru_metrics().core.evictions, 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_try_new_rejects_negative() {
        assert_eq!(
            LruCache::<u8, u8>::try_new(-5).unwrap_err(),
            CacheError::InvalidCapacity(-5)
        );
        let cache = LruCache::<u8, u8>::try_new(5).unwrap();
        assert_eq!(cache.cap(), 5);
    }

    #[test]
    fn test_lru_init_from_config() {
        let cache: LruCache<u32, u32> = LruCache::init(LruCacheConfig::new(7), None);
        assert_eq!(cache.cap(), 7);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_resize_shrinks_from_back() {
        let mut cache = LruCache::new(5);
        for i in 0..5 {
            cache.put(i, i * 10);
        }
        cache.get(&0);
        assert_eq!(cache.resize(2), 3);
        assert_eq!(cache.cap(), 2);
        assert_eq!(keys(&cache), vec![0, 4]);
        assert_eq!(cache.lru_metrics().shrinks, 1);

        assert_eq!(cache.resize(10), 0);
        for i in 10..18 {
            cache.put(i, i);
        }
        assert_eq!(cache.len(), 10);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_iter_is_mru_first_and_non_mutating() {
        let mut cache = LruCache::new(4);
        cache.put('a', 1);
        cache.put('b', 2);
        cache.put('c', 3);
        cache.get(&'a');
        let first: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(first, vec![('a', 1), ('c', 3), ('b', 2)]);
        let again: Vec<_> = (&cache).into_iter().map(|(k, _)| *k).collect();
        assert_eq!(again, vec!['a', 'c', 'b']);
        let reversed: Vec<_> = cache.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(reversed, vec!['b', 'c', 'a']);
        assert_eq!(cache.iter().len(), 3);
    }

    #[test]
    fn test_lru_iter_mut_updates_values() {
        let mut cache = LruCache::new(3);
        cache.put("x", 1);
        cache.put("y", 2);
        for (_, v) in cache.iter_mut() {
            *v += 100;
        }
        for (_, v) in &mut cache {
            *v += 1;
        }
        assert_eq!(cache.peek(&"x"), Some(&102));
        assert_eq!(cache.peek(&"y"), Some(&103));
        assert_eq!(keys(&cache), vec!["y", "x"]);
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    struct ComplexValue {
        val: i32,
        description: String,
    }

    #[test]
    fn test_lru_complex_values() {
        let mut cache = LruCache::new(2);
        let key1 = String::from("apple");
        let key2 = String::from("banana");
        let fruit1 = ComplexValue {
            val: 1,
            description: String::from("First fruit"),
        };
        let fruit2 = ComplexValue {
            val: 2,
            description: String::from("Second fruit"),
        };
        let fruit3 = ComplexValue {
            val: 3,
            description: String::from("Third fruit"),
        };
        cache.put(key1.clone(), fruit1.clone());
        cache.put(key2.clone(), fruit2.clone());
        assert_eq!(cache.get(&key1).unwrap().val, fruit1.val);
        assert_eq!(cache.get(&key2).unwrap().val, fruit2.val);
        let evicted = cache.put(String::from("cherry"), fruit3);
        assert_eq!(evicted, Some((key1.clone(), fruit1)));
        assert_eq!(cache.evict(&key1), None);
    }

    #[test]
    fn test_lru_metrics() {
        let mut cache = LruCache::new(2);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests").unwrap(), &0.0);
        assert_eq!(metrics.get("cache_hits").unwrap(), &0.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &0.0);
        cache.put("apple", 1);
        cache.put("banana", 2);
        cache.get(&"apple");
        cache.get(&"banana");
        cache.get(&"durian");
        let metrics = cache.metrics();
        assert_eq!(metrics.get("cache_hits").unwrap(), &2.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &1.0);
        assert_eq!(metrics.get("requests").unwrap(), &3.0);
        assert_eq!(metrics.get("insertions").unwrap(), &2.0);
        cache.put("apple", 10);
        cache.put("cherry", 3);
        cache.evict(&"cherry");
        let metrics = cache.metrics();
        assert_eq!(metrics.get("updates").unwrap(), &1.0);
        assert_eq!(metrics.get("evictions").unwrap(), &1.0);
        assert_eq!(metrics.get("removals").unwrap(), &1.0);
        assert_eq!(cache.algorithm_name(), "LRU");
    }

    #[test]
    fn test_lru_check_invariants_detects_orphaned_index_entry() {
        let mut cache = LruCache::new(3);
        cache.put(1, 1);
        cache.put(2, 2);
        let handle = cache.index.lookup(&2).unwrap();
        cache.list.remove(handle);
        assert_eq!(
            cache.check_invariants(),
            Err(CacheError::Corrupted("index and ring sizes differ"))
        );
    }

    #[test]
    fn test_lru_resize_compacts_arena() {
        let mut cache = LruCache::new(1_000);
        for i in 0..1_000u32 {
            cache.put(i, i);
        }
        cache.get(&5);
        assert_eq!(cache.list.slot_count(), 1_000);

        assert_eq!(cache.resize(10), 990);
        assert_eq!(cache.list.slot_count(), 10);
        assert_eq!(keys(&cache), vec![5, 999, 998, 997, 996, 995, 994, 993, 992, 991]);
        cache.check_invariants().unwrap();

        // Index handles were repointed at the rebuilt ring.
        assert_eq!(cache.get(&993), Some(&993));
        assert_eq!(cache.put(2_000, 0), Some((991, 991)));
        assert_eq!(cache.evict(&5), Some(5));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_small_shrink_keeps_arena() {
        let mut cache = LruCache::new(10);
        for i in 0..10u32 {
            cache.put(i, i);
        }
        cache.resize(8);
        assert_eq!(cache.list.slot_count(), 10);
        cache.check_invariants().unwrap();
    }

    /// Key whose hash flips between two values on every call, so the index can
    /// miss on lookup and then collide on insert within a single `put`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FlippingKey {
        id: u64,
        flips: bool,
    }

    std::thread_local! {
        static FLIPS: core::cell::Cell<u64> = const { core::cell::Cell::new(0) };
    }

    impl Hash for FlippingKey {
        fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
            if !self.flips {
                state.write_u64(self.id);
                return;
            }
            let n = FLIPS.with(|c| {
                let n = c.get();
                c.set(n + 1);
                n
            });
            // Distinct top bits keep the two hashes in different tag groups.
            let tag = if n % 2 == 0 { 1u64 } else { 2u64 };
            state.write_u64(self.id | (tag << 57));
        }
    }

    #[derive(Default)]
    struct IdentityHasher(u64);

    impl core::hash::Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for b in bytes {
                self.0 = self.0.rotate_left(8) ^ u64::from(*b);
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    #[test]
    fn test_lru_put_index_conflict_leaves_cache_untouched() {
        let hasher = core::hash::BuildHasherDefault::<IdentityHasher>::default();
        let mut cache = LruCache::with_hasher(2, hasher);
        let plain = FlippingKey { id: 1, flips: false };
        let flipping = FlippingKey { id: 7, flips: true };
        FLIPS.with(|c| c.set(0));

        assert_eq!(cache.put(plain.clone(), 'a'), None);
        // Lookup hashes with tag 1 and misses; insert stores under tag 2.
        assert_eq!(cache.put(flipping.clone(), 'b'), None);
        assert_eq!(cache.len(), 2);

        // Lookup misses again, insert finds the stored key: the full cache
        // must not evict `plain` for an entry it then refuses.
        assert_eq!(cache.put(flipping.clone(), 'c'), Some((flipping.clone(), 'c')));
        assert_eq!(cache.len(), 2);
        let entries: Vec<_> = cache.iter().map(|(k, v)| (k.id, *v)).collect();
        assert_eq!(entries, vec![(7, 'b'), (1, 'a')]);
        assert_eq!(cache.lru_metrics().core.evictions, 0);
        assert_eq!(cache.lru_metrics().core.insertions, 2);
        assert_eq!(cache.list.slot_count(), 3);
        assert_eq!(cache.list.check_links(), Ok(()));
    }

    #[test]
    fn test_lru_debug_output() {
        let mut cache = LruCache::new(4);
        cache.put(1, 1);
        let rendered = alloc::format!("{cache:?}");
        assert_eq!(rendered, "LruCache { capacity: 4, len: 1 }");
    }
}
