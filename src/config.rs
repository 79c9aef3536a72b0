//! Configuration Module
//!
//! Handles building and validating memoization options, either in code or from
//! environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{MemoError, Result};

/// Default staleness window in seconds
pub const DEFAULT_UPDATE_INTERVAL: u64 = 300;

/// Default maximum number of resident entries
pub const DEFAULT_MAX_SIZE: usize = 256;

/// Lowest rank ceiling accepted for an unbounded clock-strategy cache
pub const MIN_UNBOUNDED_RANK_CEILING: u64 = 1 << 32;

// == Strategy ==
/// Selects the recency bookkeeping used for LRU eviction.
///
/// Both strategies produce identical hit/miss behaviour; they only differ in
/// where they pay for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Ordered key list, most recent at the tail. O(n) per access.
    List,
    /// Logical clock rank per key. O(1) per access, linear scan on eviction.
    #[default]
    Clock,
}

impl FromStr for Strategy {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" | "legacy" => Ok(Strategy::List),
            "clock" | "fast" => Ok(Strategy::Clock),
            other => Err(MemoError::Configuration(format!(
                "unknown strategy '{}', expected 'list' or 'clock'",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::List => f.write_str("list"),
            Strategy::Clock => f.write_str("clock"),
        }
    }
}

/// Memoization options for one wrapped computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoConfig {
    /// Age after which a cached value is recomputed; zero disables expiry
    pub update_interval: Duration,
    /// Maximum number of resident entries; zero disables the bound
    pub max_size: usize,
    /// Leave the first positional argument out of the cache key
    pub skip_first: bool,
    /// Recency bookkeeping used for eviction
    pub strategy: Strategy,
    /// Highest rank the clock strategy issues before renumbering
    pub rank_ceiling: u64,
}

impl MemoConfig {
    /// Creates a config with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_skip_first(mut self, skip_first: bool) -> Self {
        self.skip_first = skip_first;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Lowers the clock strategy's rank ceiling so renumbering can be
    /// exercised without 2^64 calls.
    pub fn with_rank_ceiling(mut self, rank_ceiling: u64) -> Self {
        self.rank_ceiling = rank_ceiling;
        self
    }

    /// Returns the staleness window, or None when expiry is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        (!self.update_interval.is_zero()).then_some(self.update_interval)
    }

    /// Returns the entry bound, or None when the cache is unbounded.
    pub fn bound(&self) -> Option<usize> {
        (self.max_size > 0).then_some(self.max_size)
    }

    /// Creates a new MemoConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_UPDATE_INTERVAL` - Staleness window in seconds (default: 300, 0 disables)
    /// - `MEMO_MAX_SIZE` - Maximum resident entries (default: 256, 0 disables)
    /// - `MEMO_SKIP_FIRST` - Exclude the first argument from keys (default: false)
    /// - `MEMO_STRATEGY` - `list` or `clock` (default: clock)
    ///
    /// Unset variables keep their defaults; values that do not parse are a
    /// configuration error rather than being silently ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_value::<u64>("MEMO_UPDATE_INTERVAL")? {
            config.update_interval = Duration::from_secs(secs);
        }
        if let Some(max_size) = env_value::<usize>("MEMO_MAX_SIZE")? {
            config.max_size = max_size;
        }
        if let Some(skip_first) = env_value::<bool>("MEMO_SKIP_FIRST")? {
            config.skip_first = skip_first;
        }
        if let Ok(raw) = env::var("MEMO_STRATEGY") {
            config.strategy = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    // == Validate ==
    /// Checks option combinations that cannot work at call time.
    pub fn validate(&self) -> Result<()> {
        if self.rank_ceiling < 2 {
            return Err(MemoError::Configuration(format!(
                "rank_ceiling must be at least 2, got {}",
                self.rank_ceiling
            )));
        }

        // After renumbering, ranks 0..n are taken by residents plus the key in flight.
        if self.strategy == Strategy::Clock {
            match self.bound() {
                Some(bound) => {
                    let needed = bound as u64 + 1;
                    if self.rank_ceiling <= needed {
                        return Err(MemoError::Configuration(format!(
                            "rank_ceiling {} leaves no room for {} resident keys",
                            self.rank_ceiling, bound
                        )));
                    }
                }
                // Without a bound the key count can approach the ceiling and
                // every lookup would renumber.
                None if self.rank_ceiling < MIN_UNBOUNDED_RANK_CEILING => {
                    return Err(MemoError::Configuration(format!(
                        "rank_ceiling {} is below {} and max_size is unbounded",
                        self.rank_ceiling, MIN_UNBOUNDED_RANK_CEILING
                    )));
                }
                None => {}
            }
        }

        Ok(())
    }
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(DEFAULT_UPDATE_INTERVAL),
            max_size: DEFAULT_MAX_SIZE,
            skip_first: false,
            strategy: Strategy::default(),
            rank_ceiling: u64::MAX,
        }
    }
}

fn env_value<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            MemoError::Configuration(format!("{} has an invalid value '{}'", name, raw))
        }),
        Err(_) => Ok(None),
    }
}
