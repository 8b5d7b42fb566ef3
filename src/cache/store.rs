//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order eviction.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, InsertionOrder};
use crate::models::AnalysisType;

// == Cache Store ==
/// Artifact storage keyed by (video id, analysis type).
///
/// Once an insert pushes the size past `max_entries`, the oldest half of the
/// entries by insertion time is dropped. Reads do not refresh an entry, so
/// this is insertion-order eviction rather than true LRU.
#[derive(Debug)]
pub struct CacheStore {
    /// Artifact storage
    entries: HashMap<CacheKey, CacheEntry>,
    /// Insertion order tracker
    order: InsertionOrder,
    /// Entries dropped by the capacity policy
    evictions: u64,
    /// Size threshold
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` artifacts.
    ///
    /// A zero threshold is raised to 1.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            evictions: 0,
            max_entries: max_entries.max(1),
        }
    }

    // == Get ==
    /// Returns a copy of the artifact for the pair, if cached.
    pub fn get(&self, video_id: &str, analysis: AnalysisType) -> Option<String> {
        let key = CacheKey::new(video_id, analysis);
        self.entries.get(&key).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores the artifact for the pair, overwriting any previous one.
    ///
    /// Returns the number of entries evicted to stay within capacity.
    pub fn put(&mut self, video_id: &str, analysis: AnalysisType, value: String) -> usize {
        let key = CacheKey::new(video_id, analysis);

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.replace(value);
            return 0;
        }

        self.order.record(&key);
        self.entries.insert(key, CacheEntry::new(value));

        if self.entries.len() > self.max_entries {
            self.evict_oldest_half()
        } else {
            0
        }
    }

    // == Evict ==
    fn evict_oldest_half(&mut self) -> usize {
        let count = (self.max_entries / 2).max(1);
        let evicted = self.order.evict_oldest(count);

        for key in &evicted {
            self.entries.remove(key);
            debug!(key = %key, "evicted cached artifact");
        }

        self.evictions += evicted.len() as u64;
        evicted.len()
    }

    // == Clear ==
    /// Drops every entry. Clearing an empty store is a no-op.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the cache contents.
    pub fn stats(&self) -> CacheStats {
        let keys: Vec<&CacheKey> = self.order.keys().collect();

        CacheStats {
            total_entries: self.entries.len(),
            max_entries: self.max_entries,
            evictions: self.evictions,
            total_chars: self.entries.values().map(CacheEntry::char_len).sum(),
            oldest_inserted_at: keys
                .first()
                .and_then(|key| self.entries.get(*key))
                .map(|entry| entry.inserted_at),
            keys: keys.iter().map(|key| key.to_string()).collect(),
        }
    }

    // == Contains ==
    pub fn contains(&self, video_id: &str, analysis: AnalysisType) -> bool {
        self.entries.contains_key(&CacheKey::new(video_id, analysis))
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(crate::cache::DEFAULT_MAX_ENTRIES)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: AnalysisType = AnalysisType::Summary;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_default_threshold() {
        assert_eq!(CacheStore::default().max_entries(), 50);
    }

    #[test]
    fn test_store_zero_threshold_is_raised() {
        assert_eq!(CacheStore::new(0).max_entries(), 1);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = CacheStore::new(100);

        store.put("vid1", SUMMARY, "artifact1".to_string());

        assert_eq!(store.get("vid1", SUMMARY).as_deref(), Some("artifact1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_missing_is_none() {
        let store = CacheStore::new(100);
        assert!(store.get("missing", SUMMARY).is_none());
    }

    #[test]
    fn test_store_analysis_type_is_part_of_key() {
        let mut store = CacheStore::new(100);

        store.put("vid1", SUMMARY, "summary".to_string());

        assert!(store.get("vid1", AnalysisType::FactCheck).is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100);

        store.put("vid1", SUMMARY, "old".to_string());
        store.put("vid1", SUMMARY, "new".to_string());

        assert_eq!(store.get("vid1", SUMMARY).as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_evicts_oldest_half() {
        let mut store = CacheStore::new(4);

        for id in ["A", "B", "C", "D"] {
            assert_eq!(store.put(id, SUMMARY, id.to_string()), 0);
        }
        assert_eq!(store.len(), 4);

        let evicted = store.put("E", SUMMARY, "E".to_string());

        assert_eq!(evicted, 2);
        assert_eq!(store.len(), 3);
        assert!(!store.contains("A", SUMMARY));
        assert!(!store.contains("B", SUMMARY));
        for id in ["C", "D", "E"] {
            assert!(store.contains(id, SUMMARY), "{} should remain", id);
        }
    }

    #[test]
    fn test_store_reads_do_not_protect_from_eviction() {
        let mut store = CacheStore::new(4);

        for id in ["A", "B", "C", "D"] {
            store.put(id, SUMMARY, id.to_string());
        }
        // A true LRU would keep A after this read
        assert!(store.get("A", SUMMARY).is_some());

        store.put("E", SUMMARY, "E".to_string());

        assert!(!store.contains("A", SUMMARY));
    }

    #[test]
    fn test_store_overwrite_keeps_insertion_position() {
        let mut store = CacheStore::new(4);

        for id in ["A", "B", "C", "D"] {
            store.put(id, SUMMARY, id.to_string());
        }
        store.put("A", SUMMARY, "A2".to_string());
        store.put("E", SUMMARY, "E".to_string());

        assert!(!store.contains("A", SUMMARY));
        assert!(!store.contains("B", SUMMARY));
    }

    #[test]
    fn test_store_threshold_of_one() {
        let mut store = CacheStore::new(1);

        store.put("A", SUMMARY, "A".to_string());
        store.put("B", SUMMARY, "B".to_string());

        assert_eq!(store.len(), 1);
        assert!(store.contains("B", SUMMARY));
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(100);

        store.clear();
        assert!(store.is_empty());

        store.put("vid1", SUMMARY, "x".to_string());
        store.clear();

        assert_eq!(store.stats().total_entries, 0);
        assert!(store.get("vid1", SUMMARY).is_none());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(2);

        store.put("A", SUMMARY, "aaaa".to_string());
        store.put("B", SUMMARY, "bb".to_string());
        store.put("C", SUMMARY, "c".to_string());

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.max_entries, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_chars, 3);
        assert_eq!(stats.keys.len(), 2);
        assert!(stats.keys[0].starts_with("B_summary_"));
        assert!(stats.keys[1].starts_with("C_summary_"));
        assert!(stats.oldest_inserted_at.is_some());
    }
}
