//! Cache Entry Module
//!
//! Defines the structure for individual memoized results with staleness support.

use std::time::Duration;

// == Cache Entry ==
/// One memoized result and the moment it was computed.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Result of one successful invocation of the wrapped computation
    pub value: V,
    /// Clock reading taken when the computation completed
    pub acquired_at: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with `acquired_at`.
    pub fn new(value: V, acquired_at: Duration) -> Self {
        Self { value, acquired_at }
    }

    // == Age ==
    /// Returns how long ago the value was computed, saturating at zero.
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.acquired_at)
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived `update_interval`.
    ///
    /// Boundary condition: an entry exactly `update_interval` old is still
    /// fresh; only a strictly greater age makes it stale. `None` means expiry
    /// is disabled and the entry never goes stale.
    pub fn is_stale(&self, now: Duration, update_interval: Option<Duration>) -> bool {
        match update_interval {
            Some(interval) => self.age(now) > interval,
            None => false,
        }
    }

    /// Returns how long the entry stays fresh, or None if expiry is disabled.
    pub fn fresh_for(&self, now: Duration, update_interval: Option<Duration>) -> Option<Duration> {
        update_interval.map(|interval| interval.saturating_sub(self.age(now)))
    }
}
