//! Cache Statistics Module
//!
//! Point-in-time snapshot of what the cache holds.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the cache contents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Configured size threshold
    pub max_entries: usize,
    /// Entries removed by the capacity policy since creation
    pub evictions: u64,
    /// Sum of artifact lengths in characters
    pub total_chars: usize,
    /// Display form of every key, oldest first
    pub keys: Vec<String>,
    /// Insertion time of the oldest entry
    pub oldest_inserted_at: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Fill Ratio ==
    /// Calculates how full the cache is.
    ///
    /// Returns total_entries / max_entries, or 0.0 for a zero threshold.
    pub fn fill_ratio(&self) -> f64 {
        if self.max_entries == 0 {
            0.0
        } else {
            self.total_entries as f64 / self.max_entries as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }
}
