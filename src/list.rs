//! Arena-backed doubly linked recency ring.
//!
//! Nodes live in a single `Vec` owned by the list and link to each other by slot
//! index instead of by pointer. Slot 0 is the sentinel: it never stores a value,
//! its `next` link is the head (most recent) and its `prev` link is the tail
//! (least recent). An empty list is the sentinel linked to itself, so no link is
//! ever "null" and none of the relinking code needs an empty-list special case.
//!
//! ```text
//!   slot:   0 (sentinel)     3            1            2
//!          ┌──────────┐  ┌────────┐  ┌────────┐  ┌────────┐
//!   ──────►│ next: 3  │─►│ val: C │─►│ val: A │─►│ val: B │──┐
//!   │      │ prev: 2  │  └────────┘  └────────┘  └────────┘  │
//!   │      └──────────┘                                       │
//!   └─────────────────────────────────────────────────────────┘
//!            head = C (MRU)                    tail = B (LRU)
//! ```
//!
//! Callers hold [`NodeHandle`]s: a slot index plus the generation of the slot
//! when the node was created. Released slots are recycled through a free list
//! and their generation is bumped, so a handle to a removed node never resolves
//! to whatever reuses its slot later.
//!
//! # Teardown
//!
//! Dropping the list walks from the head along `next` links and drops each
//! value before advancing. Ownership is centralised in the arena, so stack depth
//! stays constant no matter how long the ring is, and the walk itself never
//! allocates.
//!
//! # Memory
//!
//! Released slots stay in the arena for reuse, so `clear` and `remove` never
//! give memory back. [`RecencyList::compact`] rebuilds the arena at its live
//! size.
//!
//! # Examples
//!
//! ```
//! use arena_lru::list::RecencyList;
//!
//! let mut list = RecencyList::new();
//! list.push_back(1);
//! let two = list.push_back(2);
//! list.push_back(3);
//!
//! list.move_to_front(two);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
//!
//! list.move_to_back(two);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 2]);
//! assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![2, 3, 1]);
//! ```

extern crate alloc;

use crate::error::CacheError;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;

/// Slot index reserved for the sentinel node.
const SENTINEL: usize = 0;

/// Opaque reference to a node in a [`RecencyList`].
///
/// Handles are only meaningful for the list that produced them. A handle to a
/// node that has since been removed is rejected by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    index: usize,
    generation: u32,
}

struct Node<T> {
    /// `None` for the sentinel and for released slots.
    value: Option<T>,
    prev: usize,
    next: usize,
    generation: u32,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Node {
            value: None,
            prev: SENTINEL,
            next: SENTINEL,
            generation: 0,
        }
    }
}

/// A doubly linked ring of values stored in an arena.
///
/// Every positional operation is O(1): nodes are addressed by [`NodeHandle`],
/// so relocating or removing one never requires a search.
pub struct RecencyList<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    len: usize,
    /// Generation given to slots pushed onto the arena.
    fresh_generation: u32,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes before the arena
    /// has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::sentinel());
        RecencyList {
            nodes,
            free: Vec::new(),
            len: 0,
            fresh_generation: 0,
        }
    }

    /// Returns the number of values in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of arena slots, live or free.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns `true` if `handle` refers to a live node of this list.
    #[inline]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Inserts `value` at the front (most recent end) and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let idx = self.allocate(value);
        self.link_after(idx, SENTINEL);
        self.handle_for(idx)
    }

    /// Inserts `value` at the back (least recent end) and returns its handle.
    pub fn push_back(&mut self, value: T) -> NodeHandle {
        let idx = self.allocate(value);
        self.link_before(idx, SENTINEL);
        self.handle_for(idx)
    }

    /// Moves the node to the front. Returns `false` if the handle is stale.
    pub fn move_to_front(&mut self, handle: NodeHandle) -> bool {
        let Some(idx) = self.resolve(handle) else {
            return false;
        };
        if self.nodes[SENTINEL].next != idx {
            self.unlink(idx);
            self.link_after(idx, SENTINEL);
        }
        true
    }

    /// Moves the node to the back. Returns `false` if the handle is stale.
    pub fn move_to_back(&mut self, handle: NodeHandle) -> bool {
        let Some(idx) = self.resolve(handle) else {
            return false;
        };
        if self.nodes[SENTINEL].prev != idx {
            self.unlink(idx);
            self.link_before(idx, SENTINEL);
        }
        true
    }

    /// Unlinks the node, frees its slot and returns its value.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        let idx = self.resolve(handle)?;
        self.unlink(idx);
        self.release(idx)
    }

    /// Removes and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let idx = self.nodes[SENTINEL].next;
        if idx == SENTINEL {
            return None;
        }
        self.unlink(idx);
        self.release(idx)
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.nodes[SENTINEL].prev;
        if idx == SENTINEL {
            return None;
        }
        self.unlink(idx);
        self.release(idx)
    }

    /// Returns the front (most recent) value.
    pub fn front(&self) -> Option<&T> {
        self.nodes[self.nodes[SENTINEL].next].value.as_ref()
    }

    /// Returns the back (least recent) value.
    pub fn back(&self) -> Option<&T> {
        self.nodes[self.nodes[SENTINEL].prev].value.as_ref()
    }

    /// Returns the handle of the front node.
    pub fn front_handle(&self) -> Option<NodeHandle> {
        let idx = self.nodes[SENTINEL].next;
        (idx != SENTINEL).then(|| self.handle_for(idx))
    }

    /// Returns the handle of the back node.
    pub fn back_handle(&self) -> Option<NodeHandle> {
        let idx = self.nodes[SENTINEL].prev;
        (idx != SENTINEL).then(|| self.handle_for(idx))
    }

    /// Returns the value behind `handle`.
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        let idx = self.resolve(handle)?;
        self.nodes[idx].value.as_ref()
    }

    /// Returns a mutable reference to the value behind `handle`.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        let idx = self.resolve(handle)?;
        self.nodes[idx].value.as_mut()
    }

    /// Iterates values from front to back. Use `.rev()` for back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.nodes[SENTINEL].next,
            back: self.nodes[SENTINEL].prev,
            remaining: self.len,
        }
    }

    /// Iterates mutable values from front to back without changing the order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.nodes[SENTINEL].next,
            back: self.nodes[SENTINEL].prev,
            remaining: self.len,
            nodes: self.nodes.as_mut_ptr(),
            _marker: PhantomData,
        }
    }

    /// Iterates node handles from front to back.
    pub fn handles(&self) -> Handles<'_, T> {
        Handles {
            list: self,
            current: self.nodes[SENTINEL].next,
            remaining: self.len,
        }
    }

    /// Releases every node, walking from the front. Arena slots are kept for
    /// reuse.
    pub fn clear(&mut self) {
        let mut idx = self.nodes[SENTINEL].next;
        while idx != SENTINEL {
            let next = self.nodes[idx].next;
            self.release(idx);
            idx = next;
        }
        let sentinel = &mut self.nodes[SENTINEL];
        sentinel.next = SENTINEL;
        sentinel.prev = SENTINEL;
    }

    /// Rebuilds the arena with exactly `len` slots, keeping the order, and
    /// drops the free list.
    ///
    /// Every node moves, so every handle obtained before the call is stale
    /// afterwards. `relocated` is called front to back with each value and its
    /// new handle so callers can repoint what they hold.
    pub fn compact<F>(&mut self, mut relocated: F)
    where
        F: FnMut(&T, NodeHandle),
    {
        let mut old = mem::replace(&mut self.nodes, Vec::with_capacity(self.len + 1));
        let newest = old.iter().map(|n| n.generation).max().unwrap_or(0);
        self.nodes.push(Node::sentinel());
        self.free = Vec::new();
        self.len = 0;
        // Old handles must not resolve to the new slots.
        self.fresh_generation = newest.wrapping_add(1);

        let mut idx = old[SENTINEL].next;
        while idx != SENTINEL {
            let node = &mut old[idx];
            idx = node.next;
            if let Some(value) = node.value.take() {
                let handle = self.push_back(value);
                if let Some(value) = self.get(handle) {
                    relocated(value, handle);
                }
            }
        }
    }

    /// Verifies that the ring is well formed: neighbour links are symmetric,
    /// exactly `len` value-holding nodes are reachable from the sentinel, and
    /// the walk returns to the sentinel.
    pub fn check_links(&self) -> Result<(), CacheError> {
        if self.nodes[SENTINEL].value.is_some() {
            return Err(CacheError::Corrupted("sentinel holds a value"));
        }
        let mut prev = SENTINEL;
        let mut idx = self.nodes[SENTINEL].next;
        let mut seen = 0usize;
        while idx != SENTINEL {
            let node = self
                .nodes
                .get(idx)
                .ok_or(CacheError::Corrupted("link points outside the arena"))?;
            if node.prev != prev {
                return Err(CacheError::Corrupted("prev link does not mirror next link"));
            }
            if node.value.is_none() {
                return Err(CacheError::Corrupted("released slot still linked"));
            }
            seen += 1;
            if seen > self.len {
                return Err(CacheError::Corrupted("more linked nodes than len"));
            }
            prev = idx;
            idx = node.next;
        }
        if self.nodes[SENTINEL].prev != prev {
            return Err(CacheError::Corrupted("sentinel prev is not the tail"));
        }
        if seen != self.len {
            return Err(CacheError::Corrupted("fewer linked nodes than len"));
        }
        Ok(())
    }

    fn resolve(&self, handle: NodeHandle) -> Option<usize> {
        debug_assert_ne!(handle.index, SENTINEL, "sentinel handle escaped the list");
        if handle.index == SENTINEL {
            return None;
        }
        let node = self.nodes.get(handle.index)?;
        (node.generation == handle.generation && node.value.is_some()).then_some(handle.index)
    }

    #[inline]
    fn handle_for(&self, idx: usize) -> NodeHandle {
        NodeHandle {
            index: idx,
            generation: self.nodes[idx].generation,
        }
    }

    fn allocate(&mut self, value: T) -> usize {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            self.nodes[idx].value = Some(value);
            idx
        } else {
            self.nodes.push(Node {
                value: Some(value),
                prev: SENTINEL,
                next: SENTINEL,
                generation: self.fresh_generation,
            });
            self.nodes.len() - 1
        }
    }

    /// Frees an already unlinked slot.
    fn release(&mut self, idx: usize) -> Option<T> {
        let node = &mut self.nodes[idx];
        let value = node.value.take();
        node.generation = node.generation.wrapping_add(1);
        node.prev = SENTINEL;
        node.next = SENTINEL;
        self.free.push(idx);
        self.len -= 1;
        value
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn link_after(&mut self, idx: usize, anchor: usize) {
        let next = self.nodes[anchor].next;
        self.nodes[idx].prev = anchor;
        self.nodes[idx].next = next;
        self.nodes[anchor].next = idx;
        self.nodes[next].prev = idx;
    }

    fn link_before(&mut self, idx: usize, anchor: usize) {
        let prev = self.nodes[anchor].prev;
        self.nodes[idx].prev = prev;
        self.nodes[idx].next = anchor;
        self.nodes[prev].next = idx;
        self.nodes[anchor].prev = idx;
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RecencyList<T> {
    fn drop(&mut self) {
        // Values go in ring order; the arena is then a flat Vec of empty slots.
        let mut idx = self.nodes[SENTINEL].next;
        while idx != SENTINEL {
            let node = &mut self.nodes[idx];
            idx = node.next;
            drop(node.value.take());
        }
    }
}

impl<T> fmt::Debug for RecencyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyList")
            .field("len", &self.len)
            .field("slots", &(self.nodes.len() - 1))
            .finish()
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

/// Front-to-back iterator over mutable values of a [`RecencyList`].
pub struct IterMut<'a, T> {
    nodes: *mut Node<T>,
    front: usize,
    back: usize,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `front` is a linked slot of the arena borrowed mutably for 'a.
        // `remaining` guarantees each linked slot is yielded at most once from
        // either end, so no two returned references alias.
        let node = unsafe { &mut *self.nodes.add(self.front) };
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_mut()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: see `next`.
        let node = unsafe { &mut *self.nodes.add(self.back) };
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_mut()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish()
    }
}

// SAFETY: `IterMut` behaves like `&mut [Node<T>]`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: `IterMut` behaves like `&mut [Node<T>]`.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// Front-to-back iterator over the node handles of a [`RecencyList`].
pub struct Handles<'a, T> {
    list: &'a RecencyList<T>,
    current: usize,
    remaining: usize,
}

impl<T> Iterator for Handles<'_, T> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<NodeHandle> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.current;
        self.current = self.list.nodes[idx].next;
        self.remaining -= 1;
        Some(self.list.handle_for(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Handles<'_, T> {}

impl<T> fmt::Debug for Handles<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handles")
            .field("remaining", &self.remaining)
            .finish()
    }
}
