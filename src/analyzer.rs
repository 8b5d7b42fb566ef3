//! Analyzer
//!
//! Owns one artifact cache and one extractor, and exposes single-video and
//! batch analysis on top of them.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::batch::{Analyzed, BatchOptions, BatchReport, Dispatcher};
use crate::cache::{CacheStats, ResultCache};
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::extract::{Extractor, YoutubeExtractor, YtDlpSource};
use crate::models::AnalysisType;

/// Entry point for analysis.
///
/// Each analyzer has its own cache, so independent instances never see each
/// other's artifacts.
#[derive(Clone)]
pub struct Analyzer {
    config: Config,
    dispatcher: Dispatcher,
}

impl Analyzer {
    /// Creates an analyzer around any extractor.
    pub fn new(config: Config, extractor: Arc<dyn Extractor>) -> Self {
        let cache = ResultCache::new(config.cache_max_entries);
        Self {
            dispatcher: Dispatcher::new(cache, extractor),
            config,
        }
    }

    /// Creates an analyzer that pulls subtitles with yt-dlp.
    pub fn from_config(config: Config) -> Self {
        let extractor = YoutubeExtractor::new(YtDlpSource::from_config(&config));
        Self::new(config, Arc::new(extractor))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Batch options seeded from the configured worker count.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::with_workers(self.config.max_workers)
    }

    /// Analyzes one video, serving repeats from the cache.
    pub async fn analyze_video(
        &self,
        reference: &str,
        analysis: AnalysisType,
    ) -> std::result::Result<Analyzed, ExtractError> {
        let started = Instant::now();
        let analyzed = self.dispatcher.analyze_one(reference, analysis).await?;

        info!(
            video = %analyzed.video,
            analysis = %analysis,
            from_cache = analyzed.from_cache,
            chars = analyzed.artifact.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "video analyzed"
        );
        Ok(analyzed)
    }

    /// Analyzes many videos concurrently and merges the successes.
    pub async fn analyze_batch(
        &self,
        references: &[String],
        analysis: AnalysisType,
        options: &BatchOptions,
    ) -> Result<BatchReport> {
        self.dispatcher
            .analyze_batch(references, analysis, options)
            .await
    }

    pub async fn clear_cache(&self) {
        self.dispatcher.cache().clear().await;
        info!("cache cleared");
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.dispatcher.cache().stats().await
    }
}
