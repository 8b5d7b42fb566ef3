//! Insertion Order Module
//!
//! Tracks the order keys entered the cache so the oldest can be evicted.

use std::collections::VecDeque;

use crate::cache::CacheKey;

// == Insertion Order ==
/// Records keys by first insertion.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently inserted
/// - Back = Oldest
///
/// Reads never reorder keys, and re-inserting a tracked key keeps its place.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<CacheKey>,
}

impl InsertionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records a newly inserted key. Already-tracked keys are left in place.
    pub fn record(&mut self, key: &CacheKey) {
        if !self.contains(key) {
            self.order.push_front(key.clone());
        }
    }

    // == Evict Oldest ==
    /// Removes and returns up to `count` of the oldest keys, oldest first.
    pub fn evict_oldest(&mut self, count: usize) -> Vec<CacheKey> {
        let count = count.min(self.order.len());
        (0..count).filter_map(|_| self.order.pop_back()).collect()
    }

    // == Keys ==
    /// Tracked keys, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.order.iter().rev()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
