//! Batch Dispatcher
//!
//! Runs the single-video pipeline over many references with a bounded number
//! of concurrent workers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::{mpsc::UnboundedSender, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::batch::{merge_payload, JobResult, JobState, JobUpdate};
use crate::cache::ResultCache;
use crate::config::DEFAULT_MAX_WORKERS;
use crate::error::{DispatchError, ExtractError, JobError, Result};
use crate::extract::Extractor;
use crate::models::{AnalysisType, VideoId};

// == Batch Options ==
/// Per-call knobs for `analyze_batch`.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum pipelines running at the same time
    pub max_workers: usize,
    /// Deadline for the whole batch; unfinished jobs are recorded as timed out
    pub timeout: Option<Duration>,
    /// Receives every job state change
    pub progress: Option<UnboundedSender<JobUpdate>>,
}

impl BatchOptions {
    pub fn with_workers(max_workers: usize) -> Self {
        Self {
            max_workers,
            ..Self::default()
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            timeout: None,
            progress: None,
        }
    }
}

// == Single Analysis ==
/// An artifact and whether it came from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analyzed {
    pub video: VideoId,
    pub artifact: String,
    pub from_cache: bool,
}

// == Batch Report ==
/// Everything a batch call produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub analysis: AnalysisType,
    /// Number of distinct references submitted
    pub attempted: usize,
    /// One result per reference: finished jobs in completion order, then any
    /// cut off by the timeout
    pub results: Vec<JobResult>,
    /// Merged artifacts, `None` when every job failed
    pub payload: Option<String>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Reference to success flag.
    pub fn outcomes(&self) -> HashMap<String, bool> {
        self.results
            .iter()
            .map(|r| (r.reference().to_string(), r.is_success()))
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn cache_hits(&self) -> usize {
        self.results.iter().filter(|r| r.from_cache()).count()
    }

    pub fn is_total_failure(&self) -> bool {
        self.payload.is_none()
    }
}

// == Dispatcher ==
/// Cache-aware pipeline runner shared by single and batch analysis.
#[derive(Clone)]
pub struct Dispatcher {
    cache: ResultCache,
    extractor: Arc<dyn Extractor>,
}

impl Dispatcher {
    pub fn new(cache: ResultCache, extractor: Arc<dyn Extractor>) -> Self {
        Self { cache, extractor }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    // == Analyze One ==
    /// Cache lookup, then extraction on a miss. Successful extractions are cached.
    pub async fn analyze_one(
        &self,
        reference: &str,
        analysis: AnalysisType,
    ) -> std::result::Result<Analyzed, ExtractError> {
        let video = VideoId::parse(reference)?;

        if let Some(artifact) = self.cache.get(video.as_str(), analysis).await {
            debug!(video = %video, analysis = %analysis, "cache hit");
            return Ok(Analyzed {
                video,
                artifact,
                from_cache: true,
            });
        }

        let artifact = self
            .extractor
            .extract_and_format(&video, reference, analysis)
            .await?;

        let evicted = self
            .cache
            .put(video.as_str(), analysis, artifact.clone())
            .await;
        if evicted > 0 {
            debug!(evicted, "cache over threshold, dropped oldest entries");
        }

        Ok(Analyzed {
            video,
            artifact,
            from_cache: false,
        })
    }

    // == Analyze Batch ==
    /// Analyzes every reference under one analysis type.
    ///
    /// Individual failures are recorded in the report; only an unusable worker
    /// count returns an error.
    pub async fn analyze_batch(
        &self,
        references: &[String],
        analysis: AnalysisType,
        options: &BatchOptions,
    ) -> Result<BatchReport> {
        if options.max_workers == 0 {
            return Err(DispatchError::InvalidWorkerCount(options.max_workers));
        }

        let started = Instant::now();
        let references = dedupe(references);
        let attempted = references.len();
        info!(
            videos = attempted,
            analysis = %analysis,
            workers = options.max_workers,
            "starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(options.max_workers));
        let mut workers = JoinSet::new();

        for (index, reference) in references.iter().enumerate() {
            notify(&options.progress, index, reference, JobState::Submitted);

            let dispatcher = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let progress = options.progress.clone();
            let reference = reference.clone();

            workers.spawn(async move {
                dispatcher
                    .run_job(index, reference, analysis, semaphore, progress)
                    .await
            });
        }

        let deadline = options.timeout.map(|t| tokio::time::Instant::now() + t);
        let mut results = Vec::with_capacity(attempted);
        let mut timed_out = false;

        loop {
            let joined = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, workers.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            timed_out = true;
                            break;
                        }
                    }
                }
                None => workers.join_next().await,
            };

            match joined {
                Some(Ok(result)) => results.push(result),
                Some(Err(e)) => error!(error = %e, "batch worker did not return a result"),
                None => break,
            }
        }

        if timed_out {
            drain_finished(&mut workers, &mut results);
            warn!("batch deadline reached, abandoning unfinished jobs");
            workers.abort_all();
        }

        // Every reference gets exactly one result, even if its worker never reported
        let finished: HashSet<usize> = results.iter().map(JobResult::index).collect();
        for (index, reference) in references.iter().enumerate() {
            if finished.contains(&index) {
                continue;
            }
            let error = if timed_out {
                JobError::TimedOut
            } else {
                JobError::WorkerPanicked
            };
            notify(&options.progress, index, reference, JobState::Failed);
            results.push(JobResult::failed(index, reference.clone(), error, started.elapsed()));
        }

        let payload = merge_payload(attempted, &results, &Local::now());
        let report = BatchReport {
            analysis,
            attempted,
            results,
            payload,
            elapsed: started.elapsed(),
        };

        info!(
            succeeded = report.succeeded(),
            attempted,
            cache_hits = report.cache_hits(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch finished"
        );
        Ok(report)
    }

    async fn run_job(
        &self,
        index: usize,
        reference: String,
        analysis: AnalysisType,
        semaphore: Arc<Semaphore>,
        progress: Option<UnboundedSender<JobUpdate>>,
    ) -> JobResult {
        // The semaphore is never closed, so acquiring only waits for a free slot
        let _permit = semaphore.acquire_owned().await;
        notify(&progress, index, &reference, JobState::Running);

        let started = Instant::now();
        let result = match self.analyze_one(&reference, analysis).await {
            Ok(analyzed) => {
                debug!(
                    reference = %reference,
                    from_cache = analyzed.from_cache,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "job succeeded"
                );
                JobResult::succeeded(
                    index,
                    reference,
                    analyzed.artifact,
                    analyzed.from_cache,
                    started.elapsed(),
                )
            }
            Err(e) => {
                warn!(reference = %reference, kind = e.kind(), error = %e, "job failed");
                JobResult::failed(index, reference, e.into(), started.elapsed())
            }
        };

        notify(&progress, index, result.reference(), result.state());
        result
    }
}

// == Helper Functions ==
fn notify(
    progress: &Option<UnboundedSender<JobUpdate>>,
    index: usize,
    reference: &str,
    state: JobState,
) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching
        let _ = tx.send(JobUpdate {
            index,
            reference: reference.to_string(),
            state,
        });
    }
}

/// Collects jobs that already finished without waiting for the rest.
fn drain_finished(workers: &mut JoinSet<JobResult>, results: &mut Vec<JobResult>) {
    while let Some(joined) = workers.try_join_next() {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => error!(error = %e, "batch worker did not return a result"),
        }
    }
}

/// Keeps the first occurrence of each reference.
fn dedupe(references: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    references
        .iter()
        .filter(|reference| {
            let fresh = seen.insert(reference.as_str());
            if !fresh {
                warn!(reference = %reference, "duplicate reference skipped");
            }
            fresh
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails for ids starting with "bad", otherwise echoes the id.
    struct EchoExtractor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Extractor for EchoExtractor {
        async fn extract_and_format(
            &self,
            video: &VideoId,
            _reference: &str,
            analysis: AnalysisType,
        ) -> std::result::Result<String, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if video.as_str().starts_with("bad") {
                Err(ExtractError::NoTranscript(video.to_string()))
            } else {
                Ok(format!("{}:{}", video, analysis))
            }
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<EchoExtractor>) {
        let extractor = Arc::new(EchoExtractor {
            calls: AtomicUsize::new(0),
        });
        (
            Dispatcher::new(ResultCache::new(50), extractor.clone()),
            extractor,
        )
    }

    fn refs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_analyze_one_caches_result() {
        let (dispatcher, extractor) = dispatcher();

        let first = dispatcher
            .analyze_one("aaaaaaaaaaa", AnalysisType::Summary)
            .await
            .unwrap();
        let second = dispatcher
            .analyze_one("https://youtu.be/aaaaaaaaaaa", AnalysisType::Summary)
            .await
            .unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.artifact, second.artifact);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_one_does_not_cache_failures() {
        let (dispatcher, extractor) = dispatcher();

        for _ in 0..2 {
            let err = dispatcher
                .analyze_one("badaaaaaaaa", AnalysisType::Summary)
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractError::NoTranscript(_)));
        }
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_analyze_one_invalid_reference() {
        let (dispatcher, extractor) = dispatcher();

        let err = dispatcher
            .analyze_one("https://vimeo.com/1", AnalysisType::Summary)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::NotFound(_)));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_workers_is_rejected() {
        let (dispatcher, _) = dispatcher();

        let err = dispatcher
            .analyze_batch(&refs(&["aaaaaaaaaaa"]), AnalysisType::Summary, &BatchOptions::with_workers(0))
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::InvalidWorkerCount(0));
    }

    #[tokio::test]
    async fn test_duplicates_are_collapsed() {
        let (dispatcher, extractor) = dispatcher();
        let input = refs(&["aaaaaaaaaaa", "bbbbbbbbbbb", "aaaaaaaaaaa"]);

        let report = dispatcher
            .analyze_batch(&input, AnalysisType::Summary, &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.outcomes().len(), 2);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (dispatcher, _) = dispatcher();

        let report = dispatcher
            .analyze_batch(&[], AnalysisType::Summary, &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(report.attempted, 0);
        assert!(report.results.is_empty());
        assert!(report.is_total_failure());
    }

    #[tokio::test]
    async fn test_progress_reports_every_transition() {
        let (dispatcher, _) = dispatcher();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let options = BatchOptions {
            progress: Some(tx),
            ..BatchOptions::default()
        };

        dispatcher
            .analyze_batch(&refs(&["aaaaaaaaaaa", "badaaaaaaaa"]), AnalysisType::Summary, &options)
            .await
            .unwrap();
        drop(options);

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }

        for index in 0..2 {
            let states: Vec<JobState> = updates
                .iter()
                .filter(|u| u.index == index)
                .map(|u| u.state)
                .collect();
            let terminal = if index == 0 {
                JobState::Succeeded
            } else {
                JobState::Failed
            };
            assert_eq!(states, vec![JobState::Submitted, JobState::Running, terminal]);
        }
    }

    #[tokio::test]
    async fn test_drain_finished_keeps_completed_jobs() {
        let mut workers = JoinSet::new();
        workers.spawn(async {
            JobResult::succeeded(0, "done", "artifact".to_string(), true, Duration::ZERO)
        });
        workers.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            JobResult::succeeded(1, "slow", "late".to_string(), false, Duration::ZERO)
        });

        // Let the quick job run to completion on this runtime
        tokio::time::sleep(Duration::from_millis(20)).await;

        let mut results = Vec::new();
        drain_finished(&mut workers, &mut results);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reference(), "done");
        assert_eq!(workers.len(), 1);
        workers.abort_all();
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_order() {
        let deduped = dedupe(&refs(&["b", "a", "b", "c", "a"]));
        assert_eq!(deduped, refs(&["b", "a", "c"]));
    }
}
