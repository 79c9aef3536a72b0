//! Memoize Module
//!
//! Wraps a computation so repeated calls with equal arguments are answered
//! from a `MemoCache`.

use std::marker::PhantomData;

use serde::Serialize;

use crate::cache::{CacheStats, Clock, MemoCache, SystemClock};
use crate::config::MemoConfig;
use crate::error::{MemoError, Result};

// == Memoize ==
/// Wraps `func` in a cache configured by `config`.
///
/// The returned wrapper is called with the same argument value `func` takes.
/// Invalid options are reported here, before any call is made.
///
/// # Example
/// ```
/// use memo_cache::{memoize, MemoConfig};
///
/// let mut square = memoize(|x: u64| Ok::<_, String>(x * x), MemoConfig::default()).unwrap();
/// assert_eq!(square.call(12).unwrap(), 144);
/// assert_eq!(square.stats().misses, 1);
/// assert_eq!(square.call(12).unwrap(), 144);
/// assert_eq!(square.stats().hits, 1);
/// ```
pub fn memoize<A, V, E, F>(func: F, config: MemoConfig) -> Result<Memoized<A, V, E, F>>
where
    A: Serialize,
    V: Clone,
    F: FnMut(A) -> std::result::Result<V, E>,
{
    Memoized::new(func, config)
}

// == Memoized ==
/// A computation paired with its own result cache.
pub struct Memoized<A, V, E, F, C = SystemClock> {
    func: F,
    cache: MemoCache<V, C>,
    _signature: PhantomData<fn(A) -> std::result::Result<V, E>>,
}

impl<A, V, E, F> Memoized<A, V, E, F, SystemClock>
where
    A: Serialize,
    V: Clone,
    F: FnMut(A) -> std::result::Result<V, E>,
{
    pub fn new(func: F, config: MemoConfig) -> Result<Self> {
        Self::with_clock(func, config, SystemClock::new())
    }
}

impl<A, V, E, F, C> Memoized<A, V, E, F, C>
where
    A: Serialize,
    V: Clone,
    F: FnMut(A) -> std::result::Result<V, E>,
    C: Clock,
{
    /// Wraps `func` with a cache reading time from `clock`.
    pub fn with_clock(func: F, config: MemoConfig, clock: C) -> Result<Self> {
        Ok(Self {
            func,
            cache: MemoCache::with_clock(config, clock)?,
            _signature: PhantomData,
        })
    }

    // == Call ==
    /// Invokes the wrapped computation through the cache.
    ///
    /// Errors from the computation come back as `MemoError::Computation`
    /// holding the original error.
    pub fn call(&mut self, args: A) -> Result<V, E> {
        let key = self.cache.key_for(&args).map_err(MemoError::widen)?;
        let Self { func, cache, .. } = self;
        cache.get_or_compute_key(key, move || func(args))
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &MemoCache<V, C> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut MemoCache<V, C> {
        &mut self.cache
    }

    /// Forgets every memoized result.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Unwraps the original computation.
    pub fn into_inner(self) -> F {
        self.func
    }
}
