//! Cache Module
//!
//! Provides a bounded in-memory order cache with FIFO eviction.

mod bounded;
mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use fifo::FifoTracker;
pub use stats::CacheStats;
pub use store::{CacheStore, SetOutcome};

// == Public Constants ==
/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 10;
