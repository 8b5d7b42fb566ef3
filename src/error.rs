//! Error types for the analyzer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Extract Error Enum ==
/// Failure reported by the extraction pipeline for a single video.
///
/// Always recorded per job; a batch never aborts because of one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The reference does not name a reachable video
    #[error("Video not found: {0}")]
    NotFound(String),

    /// The video exists but has no usable subtitles
    #[error("No transcript available: {0}")]
    NoTranscript(String),

    /// The requested analysis type is not known
    #[error("Unsupported analysis type: {0}")]
    UnsupportedType(String),

    /// Network, process or filesystem failure that may succeed later
    #[error("Transient error: {0}")]
    TransientError(String),
}

impl ExtractError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::NotFound(_) => "not_found",
            ExtractError::NoTranscript(_) => "no_transcript",
            ExtractError::UnsupportedType(_) => "unsupported_type",
            ExtractError::TransientError(_) => "transient",
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::TransientError(err.to_string())
    }
}

// == Job Error Enum ==
/// Why a single batch job ended in the `Failed` state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// The caller's batch timeout fired before the job finished
    #[error("Timed out before the batch deadline")]
    TimedOut,

    /// The worker task panicked before reporting a result
    #[error("Worker task ended without a result")]
    WorkerPanicked,
}

// == Dispatch Error Enum ==
/// Systemic failures that abort a whole batch call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),
}

// == Result Type Alias ==
/// Convenience Result type for batch dispatch.
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_is_transparent_over_extraction() {
        let err = JobError::from(ExtractError::NoTranscript("abc".to_string()));
        assert_eq!(err.to_string(), "No transcript available: abc");
    }

    #[test]
    fn test_io_error_maps_to_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "yt-dlp missing");
        let err = ExtractError::from(io);
        assert_eq!(err.kind(), "transient");
    }
}
