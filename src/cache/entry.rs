//! Cache Entry Module
//!
//! Defines the structure for individual cached artifacts.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A rendered artifact and the time it entered the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The rendered artifact text
    pub value: String,
    /// When the entry was first inserted; overwrites keep this
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(value: String) -> Self {
        Self {
            value,
            inserted_at: Utc::now(),
        }
    }

    // == Replace ==
    /// Swaps in a new artifact without touching the insertion time.
    pub fn replace(&mut self, value: String) {
        self.value = value;
    }

    /// Artifact length in characters.
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}
