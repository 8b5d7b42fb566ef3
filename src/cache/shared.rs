//! Shared Cache Handle
//!
//! Cloneable handle that serializes every cache operation behind one lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::models::AnalysisType;

// == Result Cache ==
/// Thread-safe artifact cache shared by the workers of one analyzer.
///
/// Clones point at the same store. Separate `ResultCache::new` calls never
/// share entries.
#[derive(Debug, Clone)]
pub struct ResultCache {
    inner: Arc<Mutex<CacheStore>>,
}

impl ResultCache {
    /// Creates an empty cache holding at most `max_entries` artifacts.
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub async fn get(&self, video_id: &str, analysis: AnalysisType) -> Option<String> {
        self.inner.lock().await.get(video_id, analysis)
    }

    /// Returns how many entries were evicted to make room.
    pub async fn put(&self, video_id: &str, analysis: AnalysisType, artifact: String) -> usize {
        self.inner.lock().await.put(video_id, analysis, artifact)
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::from_store(CacheStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ResultCache::new(10);
        let clone = cache.clone();

        clone.put("vid1", AnalysisType::Summary, "artifact".to_string()).await;

        assert_eq!(
            cache.get("vid1", AnalysisType::Summary).await.as_deref(),
            Some("artifact")
        );
    }

    #[tokio::test]
    async fn test_separate_caches_are_isolated() {
        let a = ResultCache::new(10);
        let b = ResultCache::new(10);

        a.put("vid1", AnalysisType::Summary, "artifact".to_string()).await;

        assert!(b.get("vid1", AnalysisType::Summary).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_puts_respect_threshold() {
        let cache = ResultCache::new(8);
        let mut handles = Vec::new();

        for i in 0..64 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .put(&format!("vid{}", i), AnalysisType::Summary, i.to_string())
                    .await;
                assert!(cache.len().await <= 8);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = cache.stats().await;
        assert!(stats.total_entries <= 8);
        assert_eq!(stats.keys.len(), stats.total_entries);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let cache = ResultCache::default();

        cache.clear().await;
        cache.put("vid1", AnalysisType::Summary, "x".to_string()).await;
        cache.clear().await;
        cache.clear().await;

        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
