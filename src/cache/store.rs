//! Memo Cache Module
//!
//! Main memoization engine combining HashMap storage with recency tracking and
//! staleness checks.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::cache::{
    CacheEntry, CacheKey, CacheStats, CallArgs, Clock, EvictionPolicy, Recency, SystemClock,
};
use crate::config::{MemoConfig, Strategy};
use crate::error::{MemoError, Result};

// == Memo Cache ==
/// Result cache for one computation, bounded by entry count and aged by
/// `update_interval`.
///
/// Not internally synchronized: every operation takes `&mut self`, so shared
/// use needs an external lock around the whole cache.
#[derive(Debug)]
pub struct MemoCache<V, C = SystemClock> {
    /// Memoized results by argument key
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Recency bookkeeping for LRU eviction
    recency: Recency<CacheKey>,
    /// Performance statistics
    stats: CacheStats,
    config: MemoConfig,
    clock: C,
}

impl<V: Clone> MemoCache<V, SystemClock> {
    // == Constructor ==
    /// Creates a cache using the system clock.
    ///
    /// Fails with a configuration error if the options cannot work together.
    pub fn new(config: MemoConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<V: Clone, C: Clock> MemoCache<V, C> {
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(config: MemoConfig, clock: C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            entries: HashMap::new(),
            recency: Recency::new(config.strategy, config.rank_ceiling),
            stats: CacheStats::new(),
            config,
            clock,
        })
    }

    // == Key For ==
    /// Derives the key this cache uses for `args`.
    pub fn key_for<A: Serialize + ?Sized>(&self, args: &A) -> Result<CacheKey> {
        CacheKey::for_args(args, self.config.skip_first)
    }

    // == Get Or Compute ==
    /// Returns the cached value for `args`, running `compute` on a miss or
    /// when the cached value is stale.
    ///
    /// A failing `compute` is returned as `MemoError::Computation` and stores
    /// nothing.
    pub fn get_or_compute<A, E, F>(&mut self, args: &A, compute: F) -> Result<V, E>
    where
        A: Serialize + ?Sized,
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let key = self.key_for(args).map_err(MemoError::widen)?;
        self.get_or_compute_key(key, compute)
    }

    /// Same as `get_or_compute`, for arguments that carry keywords.
    pub fn get_or_compute_with<E, F>(&mut self, args: &CallArgs, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let key = CacheKey::derive(args, self.config.skip_first).map_err(MemoError::widen)?;
        self.get_or_compute_key(key, compute)
    }

    /// Runs the lookup for an already derived key.
    pub fn get_or_compute_key<E, F>(&mut self, key: CacheKey, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let resident = self.entries.contains_key(&key);
        self.recency.record_lookup(&key, resident);

        if resident {
            let now = self.clock.now();
            let ttl = self.config.ttl();

            if let Some(entry) = self.entries.get(&key) {
                if !entry.is_stale(now, ttl) {
                    trace!("Cache hit for {}", key);
                    self.stats.record_hit();
                    return Ok(entry.value.clone());
                }
            }

            // Stale values are discarded, never served; the recency record
            // is refreshed on success or rolled back on failure below.
            debug!("Cached value for {} is stale, recomputing", key);
            self.entries.remove(&key);
            self.stats.record_stale();
        }

        self.stats.record_miss();

        let value = match compute() {
            Ok(value) => value,
            Err(err) => {
                self.recency.rollback(&key);
                self.stats.record_failure();
                self.stats.set_total_entries(self.entries.len());
                debug!("Computation for {} failed, nothing cached", key);
                return Err(MemoError::Computation(err));
            }
        };

        let acquired_at = self.clock.now();
        self.entries
            .insert(key.clone(), CacheEntry::new(value.clone(), acquired_at));
        self.recency.record_insert(&key);
        debug!("Cached new value for {}", key);

        self.evict_overflow();
        self.stats.set_total_entries(self.entries.len());

        Ok(value)
    }

    // == Evict Overflow ==
    /// Drops the least recently used entry once the bound is exceeded.
    fn evict_overflow(&mut self) {
        let Some(bound) = self.config.bound() else {
            return;
        };

        if self.entries.len() > bound {
            if let Some(victim) = self.recency.pop_victim() {
                self.entries.remove(&victim);
                self.stats.record_eviction();
                debug!("Evicted least recently used {}", victim);
            }
        }
    }

    // == Peek ==
    /// Returns the stored value for `key` without touching recency or
    /// checking staleness.
    pub fn peek(&self, key: &CacheKey) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Returns how long the value for `key` stays fresh, or None if the key
    /// is absent or expiry is disabled.
    pub fn fresh_for(&self, key: &CacheKey) -> Option<Duration> {
        let entry = self.entries.get(key)?;
        entry.fresh_for(self.clock.now(), self.config.ttl())
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns true if one was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        if self.entries.remove(key).is_some() {
            self.recency.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Purge Stale ==
    /// Removes all stale entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_stale(&mut self) -> usize {
        let Some(ttl) = self.config.ttl() else {
            return 0;
        };
        let now = self.clock.now();

        let stale_keys: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_stale(now, Some(ttl)))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale_keys {
            self.entries.remove(key);
            self.recency.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        if !stale_keys.is_empty() {
            debug!("Purged {} stale entries", stale_keys.len());
        }
        stale_keys.len()
    }

    /// Removes every entry and resets recency bookkeeping.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.set_total_entries(0);
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn config(&self) -> &MemoConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.recency.strategy()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns resident keys in sorted order.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of keys the recency bookkeeping tracks; equals `len()` between
    /// operations.
    pub fn tracked_len(&self) -> usize {
        self.recency.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
