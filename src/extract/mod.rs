//! Extraction Module
//!
//! The single-video pipeline: fetch subtitles, clean them, wrap them in a
//! prompt template.

mod template;
mod transcript;
mod ytdlp;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ExtractError;
use crate::models::{AnalysisType, VideoId};

// Re-export public types
pub use template::{prompt_template, render_artifact, transcript_section};
pub use transcript::{Segment, TextStats, Transcript};
pub use ytdlp::YtDlpSource;

// == Extraction Traits ==
/// Produces the rendered artifact for one video and analysis type.
///
/// Implementations are shared by all batch workers, so they must be safe to
/// call concurrently.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// `reference` is the user's original input and is echoed in the artifact.
    async fn extract_and_format(
        &self,
        video: &VideoId,
        reference: &str,
        analysis: AnalysisType,
    ) -> Result<String, ExtractError>;
}

/// Where raw subtitles come from.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video: &VideoId) -> Result<Transcript, ExtractError>;
}

// == Transcript Extractor ==
/// Extractor built from a transcript source plus the cleanup and template steps.
#[derive(Debug, Clone)]
pub struct TranscriptExtractor<S> {
    source: S,
}

impl<S: TranscriptSource> TranscriptExtractor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

/// The production extractor.
pub type YoutubeExtractor = TranscriptExtractor<YtDlpSource>;

#[async_trait]
impl<S: TranscriptSource> Extractor for TranscriptExtractor<S> {
    async fn extract_and_format(
        &self,
        video: &VideoId,
        reference: &str,
        analysis: AnalysisType,
    ) -> Result<String, ExtractError> {
        let transcript = self.source.fetch(video).await?;
        let cleaned = transcript.clean_text();

        if cleaned.is_empty() {
            return Err(ExtractError::NoTranscript(format!(
                "subtitles for {} contain no text",
                video
            )));
        }

        debug!(
            video = %video,
            analysis = %analysis,
            chars = cleaned.chars().count(),
            "transcript cleaned"
        );
        Ok(render_artifact(video, reference, analysis, &cleaned))
    }
}
