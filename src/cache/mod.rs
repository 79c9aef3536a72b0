//! Cache Module
//!
//! Provides the bounded, time-aware result cache behind memoization, with two
//! interchangeable LRU bookkeeping strategies.

mod clock;
mod entry;
mod finite;
mod key;
mod list;
mod policy;
mod rank;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{CacheKey, CallArgs};
pub use list::ListLru;
pub use policy::{EvictionPolicy, Recency};
pub use rank::ClockLru;
pub use stats::CacheStats;
pub use store::MemoCache;
