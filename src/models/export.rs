//! Export documents for `--format json` delivery
//!
//! Serializable snapshots of a single analysis or a whole batch.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::batch::{Analyzed, BatchReport};
use crate::extract::{transcript_section, TextStats};
use crate::models::AnalysisType;

// == Single Video ==
/// Where an artifact came from.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub url: String,
    /// The reference exactly as the user gave it
    pub reference: String,
}

/// Document for one analyzed video.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactDocument {
    /// The rendered artifact
    pub text: String,
    /// Artifact length in characters
    pub length: usize,
    pub timestamp: DateTime<Utc>,
    pub video_info: VideoInfo,
    pub prompt_type: AnalysisType,
    pub from_cache: bool,
    /// Statistics over the transcript part of the artifact
    pub stats: TextStats,
}

impl ArtifactDocument {
    /// Creates a new ArtifactDocument stamped with `timestamp`
    pub fn new(
        reference: impl Into<String>,
        analysis: AnalysisType,
        analyzed: &Analyzed,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            text: analyzed.artifact.clone(),
            length: analyzed.artifact.chars().count(),
            timestamp,
            video_info: VideoInfo {
                video_id: analyzed.video.to_string(),
                url: analyzed.video.watch_url(),
                reference: reference.into(),
            },
            prompt_type: analysis,
            from_cache: analyzed.from_cache,
            stats: TextStats::from_text(transcript_section(&analyzed.artifact)),
        }
    }
}

// == Batch ==
/// Outcome line for one reference of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchVideo {
    pub reference: String,
    pub succeeded: bool,
    pub from_cache: bool,
    /// Time spent on this reference, including waiting for a worker slot
    pub elapsed_ms: u64,
    /// Failure reason, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Document for a whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchDocument {
    /// The merged payload, `null` when every video failed
    pub text: Option<String>,
    /// Payload length in characters
    pub length: usize,
    pub timestamp: DateTime<Utc>,
    pub prompt_type: AnalysisType,
    pub attempted: usize,
    pub succeeded: usize,
    /// In completion order, like the payload
    pub videos: Vec<BatchVideo>,
}

impl BatchDocument {
    /// Creates a new BatchDocument stamped with `timestamp`
    pub fn new(report: &BatchReport, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: report.payload.clone(),
            length: report
                .payload
                .as_deref()
                .map(|p| p.chars().count())
                .unwrap_or(0),
            timestamp,
            prompt_type: report.analysis,
            attempted: report.attempted,
            succeeded: report.succeeded(),
            videos: report
                .results
                .iter()
                .map(|r| BatchVideo {
                    reference: r.reference().to_string(),
                    succeeded: r.is_success(),
                    from_cache: r.from_cache(),
                    elapsed_ms: r.elapsed().as_millis() as u64,
                    error: r.error().map(ToString::to_string),
                })
                .collect(),
        }
    }
}
