//! Key index: hash map from cache keys to recency-list handles.
//!
//! The index never overwrites silently. Inserting a key that is already present
//! is a [`CacheError::KeyConflict`] and erasing a key that is absent is a
//! [`CacheError::KeyNotFound`]; the cache façade is expected to check for a hit
//! before it inserts.

extern crate alloc;

use crate::error::CacheError;
use crate::list::NodeHandle;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::hash_map::Entry;
#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::{Entry, RandomState as DefaultHashBuilder};
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Map from key to the handle of the node that stores the key's entry.
pub struct KeyIndex<K, S = DefaultHashBuilder> {
    map: HashMap<K, NodeHandle, S>,
}

impl<K: Hash + Eq, S: BuildHasher> KeyIndex<K, S> {
    /// Creates an empty index with room for `capacity` keys using `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        KeyIndex {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Records `key → handle`. Fails if `key` already has an entry.
    pub fn insert(&mut self, key: K, handle: NodeHandle) -> Result<(), CacheError> {
        match self.map.entry(key) {
            Entry::Occupied(_) => Err(CacheError::KeyConflict),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Returns the handle stored for `key`.
    #[inline]
    pub fn lookup<Q>(&self, key: &Q) -> Option<NodeHandle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).copied()
    }

    /// Removes `key` and returns the handle it mapped to.
    pub fn erase<Q>(&mut self, key: &Q) -> Result<NodeHandle, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key).ok_or(CacheError::KeyNotFound)
    }

    /// Points an existing `key` at `handle`. Returns `false` if `key` is absent.
    pub fn repoint<Q>(&mut self, key: &Q, handle: NodeHandle) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get_mut(key) {
            Some(slot) => {
                *slot = handle;
                true
            }
            None => false,
        }
    }

    /// Shrinks the map's allocation to hold at least `min_capacity` keys.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        self.map.shrink_to(min_capacity);
    }

    /// Returns `true` if `key` has an entry.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }
}

impl<K, S> KeyIndex<K, S> {
    /// Returns the number of keys in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, S> fmt::Debug for KeyIndex<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIndex")
            .field("len", &self.map.len())
            .finish()
    }
}
