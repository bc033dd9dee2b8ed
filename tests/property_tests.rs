//! Randomized operation sequences checked against a simple `VecDeque` model.
//!
//! The model keeps `(key, value)` pairs with the most recently used entry at
//! the front. After every step the cache must agree with the model on contents
//! and order, and its own invariant check must pass.

use arena_lru::list::RecencyList;
use arena_lru::LruCache;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum Op {
    Put(u8, u32),
    Get(u8),
    Peek(u8),
    Evict(u8),
    PopLru,
    Resize(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => (0u8..16).prop_map(Op::Get),
        1 => (0u8..16).prop_map(Op::Peek),
        1 => (0u8..16).prop_map(Op::Evict),
        1 => Just(Op::PopLru),
        1 => (0usize..8).prop_map(Op::Resize),
    ]
}

struct Model {
    cap: usize,
    entries: VecDeque<(u8, u32)>,
}

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    fn touch(&mut self, key: u8) -> Option<u32> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos)?;
        self.entries.push_front(entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32) -> Option<(u8, u32)> {
        if let Some(pos) = self.position(key) {
            let (_, old) = self.entries.remove(pos)?;
            self.entries.push_front((key, value));
            return Some((key, old));
        }
        if self.cap == 0 {
            return Some((key, value));
        }
        let evicted = if self.entries.len() >= self.cap {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front((key, value));
        evicted
    }

    fn evict(&mut self, key: u8) -> Option<u32> {
        let pos = self.position(key)?;
        self.entries.remove(pos).map(|(_, v)| v)
    }

    fn resize(&mut self, cap: usize) -> usize {
        self.cap = cap;
        let before = self.entries.len();
        self.entries.truncate(cap);
        before - self.entries.len()
    }
}

proptest! {
    #[test]
    fn test_cache_matches_model(
        cap in 0usize..6,
        ops in prop::collection::vec(op_strategy(), 1..200),
    ) {
        let mut cache: LruCache<u8, u32> = LruCache::new(cap);
        let mut model = Model { cap, entries: VecDeque::new() };

        for op in ops {
            match op {
                Op::Put(k, v) => prop_assert_eq!(cache.put(k, v), model.put(k, v)),
                Op::Get(k) => prop_assert_eq!(cache.get(&k).copied(), model.touch(k)),
                Op::Peek(k) => {
                    let expected = model.position(k).map(|p| model.entries[p].1);
                    prop_assert_eq!(cache.peek(&k).copied(), expected);
                }
                Op::Evict(k) => prop_assert_eq!(cache.evict(&k), model.evict(k)),
                Op::PopLru => prop_assert_eq!(cache.pop_lru(), model.entries.pop_back()),
                Op::Resize(c) => prop_assert_eq!(cache.resize(c), model.resize(c)),
            }

            prop_assert!(cache.check_invariants().is_ok());
            prop_assert!(cache.len() <= cache.cap());
            let actual: Vec<(u8, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            let expected: Vec<(u8, u32)> = model.entries.iter().copied().collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_peek_never_reorders(keys in prop::collection::vec(0u8..32, 1..64)) {
        let mut cache = LruCache::new(16);
        for k in &keys {
            cache.put(*k, ());
        }
        let before: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();
        for k in &keys {
            cache.peek(k);
        }
        let after: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn test_list_links_survive_random_moves(
        n in 1usize..40,
        moves in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..100),
    ) {
        let mut list = RecencyList::new();
        let handles: Vec<_> = (0..n).map(|i| list.push_back(i)).collect();
        let mut model: VecDeque<usize> = (0..n).collect();

        for (idx, to_front) in moves {
            let i = idx.index(n);
            let pos = model.iter().position(|&v| v == i).unwrap();
            model.remove(pos);
            if to_front {
                prop_assert!(list.move_to_front(handles[i]));
                model.push_front(i);
            } else {
                prop_assert!(list.move_to_back(handles[i]));
                model.push_back(i);
            }
            prop_assert!(list.check_links().is_ok());
        }

        let forward: Vec<usize> = list.iter().copied().collect();
        let backward: Vec<usize> = list.iter().rev().copied().collect();
        let mut reversed: Vec<usize> = model.iter().copied().collect();
        prop_assert_eq!(&forward, &reversed);
        reversed.reverse();
        prop_assert_eq!(backward, reversed);
    }
}
