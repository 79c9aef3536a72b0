//! Eviction Policy Module
//!
//! The recency bookkeeping interface shared by both eviction strategies, and
//! the strategy-tagged variant the cache holds.

use std::hash::Hash;

use crate::cache::{ClockLru, ListLru};
use crate::config::Strategy;

// == Eviction Policy ==
/// Recency bookkeeping driven by the cache engine.
///
/// The engine calls the hooks in this order for every lookup:
/// `record_lookup`, then on a miss either `record_insert` (success) or
/// `rollback` (the computation failed). Once an operation completes, the
/// tracked key set equals the cache's resident key set.
pub trait EvictionPolicy<K> {
    /// Marks `key` as accessed. `resident` is whether the cache currently
    /// holds a value for it.
    fn record_lookup(&mut self, key: &K, resident: bool);

    /// Registers a freshly stored key as most recently used.
    fn record_insert(&mut self, key: &K);

    /// Undoes whatever `record_lookup` did for a key that ended up absent.
    fn rollback(&mut self, key: &K);

    /// Stops tracking `key`.
    fn remove(&mut self, key: &K);

    /// Removes and returns the least recently used key.
    fn pop_victim(&mut self) -> Option<K>;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops tracking every key.
    fn clear(&mut self);
}

// == Recency ==
/// The eviction strategy picked when the cache is built.
#[derive(Debug)]
pub enum Recency<K> {
    List(ListLru<K>),
    Clock(ClockLru<K>),
}

impl<K: Clone + Eq + Hash + Ord> Recency<K> {
    /// Creates the bookkeeping for `strategy`.
    pub fn new(strategy: Strategy, rank_ceiling: u64) -> Self {
        match strategy {
            Strategy::List => Recency::List(ListLru::new()),
            Strategy::Clock => Recency::Clock(ClockLru::with_rank_ceiling(rank_ceiling)),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Recency::List(_) => Strategy::List,
            Recency::Clock(_) => Strategy::Clock,
        }
    }
}

impl<K: Clone + Eq + Hash + Ord> EvictionPolicy<K> for Recency<K> {
    fn record_lookup(&mut self, key: &K, resident: bool) {
        match self {
            Recency::List(list) => list.record_lookup(key, resident),
            Recency::Clock(clock) => clock.record_lookup(key, resident),
        }
    }

    fn record_insert(&mut self, key: &K) {
        match self {
            Recency::List(list) => list.record_insert(key),
            Recency::Clock(clock) => clock.record_insert(key),
        }
    }

    fn rollback(&mut self, key: &K) {
        match self {
            Recency::List(list) => list.rollback(key),
            Recency::Clock(clock) => clock.rollback(key),
        }
    }

    fn remove(&mut self, key: &K) {
        match self {
            Recency::List(list) => list.remove(key),
            Recency::Clock(clock) => clock.remove(key),
        }
    }

    fn pop_victim(&mut self) -> Option<K> {
        match self {
            Recency::List(list) => list.pop_victim(),
            Recency::Clock(clock) => clock.pop_victim(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Recency::List(list) => list.len(),
            Recency::Clock(clock) => clock.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Recency::List(list) => list.clear(),
            Recency::Clock(clock) => clock.clear(),
        }
    }
}
