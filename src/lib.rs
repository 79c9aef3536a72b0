//! Memo Cache - A bounded, time-aware memoization cache
//!
//! Caches the results of a computation by argument identity, with per-entry
//! staleness and LRU eviction backed by either an ordered list or a logical
//! clock index.

pub mod cache;
pub mod config;
pub mod error;
pub mod memoize;

pub use cache::{CacheKey, CacheStats, CallArgs, Clock, ManualClock, MemoCache, SystemClock};
pub use config::{MemoConfig, Strategy};
pub use error::{MemoError, Result};
pub use memoize::{memoize, Memoized};
