//! Clock LRU Module
//!
//! Logical-clock recency tracking. Every lookup stamps the key with the next
//! clock value, so a hit costs one map write; finding the victim is a linear
//! scan that only runs when the cache overflows.
//!
//! Stamps are issued optimistically at the start of a lookup, before the
//! engine knows whether the computation will succeed. A failed miss must call
//! `rollback`, otherwise the key would stay ranked without a resident value.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::info;

use crate::cache::EvictionPolicy;

// == Clock LRU ==
/// Maps each key to the clock value of its latest access.
///
/// For any two tracked keys, the larger rank was accessed more recently.
#[derive(Debug)]
pub struct ClockLru<K> {
    /// Latest access rank per key
    ranks: HashMap<K, u64>,
    /// Last rank issued
    current: u64,
    /// Highest rank that may be issued before renumbering
    ceiling: u64,
    /// Clock value to restore if the pending lookup fails
    undo: Option<u64>,
}

impl<K: Clone + Eq + Hash + Ord> ClockLru<K> {
    // == Constructor ==
    /// Creates a tracker using the full `u64` range.
    pub fn new() -> Self {
        Self::with_rank_ceiling(u64::MAX)
    }

    /// Creates a tracker that renumbers once `ceiling` has been issued.
    pub fn with_rank_ceiling(ceiling: u64) -> Self {
        Self {
            ranks: HashMap::new(),
            current: 0,
            ceiling,
            undo: None,
        }
    }

    /// Returns the rank of `key`, if tracked.
    pub fn rank_of(&self, key: &K) -> Option<u64> {
        self.ranks.get(key).copied()
    }

    /// Returns the last rank issued.
    pub fn current_rank(&self) -> u64 {
        self.current
    }

    pub fn rank_ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Returns tracked keys ordered from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        let mut ordered: Vec<(&K, u64)> = self.ranks.iter().map(|(k, r)| (k, *r)).collect();
        ordered.sort_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)));
        ordered.into_iter().map(|(k, _)| k.clone()).collect()
    }

    // == Tick ==
    /// Issues the next rank, renumbering first if the ceiling was reached.
    ///
    /// The returned rank is always one past the clock value left by the
    /// renumbering, never saturated.
    fn tick(&mut self) -> u64 {
        if self.current >= self.ceiling {
            self.renumber();
        }
        self.current = self.current.saturating_add(1);
        self.current
    }

    // == Renumber ==
    /// Compacts ranks to `0..n` keeping their relative order, and resets the
    /// clock to `n`.
    fn renumber(&mut self) {
        let ordered = self.keys_by_recency();
        let count = ordered.len();

        for (rank, key) in ordered.into_iter().enumerate() {
            self.ranks.insert(key, rank as u64);
        }
        self.current = count as u64;

        info!(
            "Recency clock reached {}, renumbered {} keys",
            self.ceiling, count
        );
    }

    #[cfg(test)]
    pub(crate) fn force_current(&mut self, value: u64) {
        self.current = value;
    }
}

impl<K: Clone + Eq + Hash + Ord> Default for ClockLru<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash + Ord> EvictionPolicy<K> for ClockLru<K> {
    fn record_lookup(&mut self, key: &K, _resident: bool) {
        let rank = self.tick();
        // Any renumbering done by the tick is kept; only the tick is undone
        self.undo = Some(rank - 1);
        self.ranks.insert(key.clone(), rank);
    }

    fn record_insert(&mut self, key: &K) {
        self.undo = None;
        if !self.ranks.contains_key(key) {
            let rank = self.tick();
            self.ranks.insert(key.clone(), rank);
        }
    }

    fn rollback(&mut self, key: &K) {
        self.ranks.remove(key);
        if let Some(previous) = self.undo.take() {
            self.current = previous;
        }
    }

    fn remove(&mut self, key: &K) {
        self.ranks.remove(key);
    }

    fn pop_victim(&mut self) -> Option<K> {
        // Ties on rank fall back to the smallest key
        let victim = self
            .ranks
            .iter()
            .min_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)))
            .map(|(k, _)| k.clone())?;
        self.ranks.remove(&victim);
        Some(victim)
    }

    fn len(&self) -> usize {
        self.ranks.len()
    }

    fn clear(&mut self) {
        self.ranks.clear();
        self.current = 0;
        self.undo = None;
    }
}
