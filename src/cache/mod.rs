//! Cache Module
//!
//! Provides the in-memory artifact cache with insertion-order eviction.

mod entry;
mod key;
mod order;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use order::InsertionOrder;
pub use shared::ResultCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default number of artifacts kept before eviction kicks in
pub const DEFAULT_MAX_ENTRIES: usize = 50;
