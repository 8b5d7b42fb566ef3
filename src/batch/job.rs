//! Batch Jobs
//!
//! Per-reference state and outcome of a batch run.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::JobError;

// == Job State ==
/// Lifecycle of one job: `Submitted -> Running -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Submitted,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Submitted => "submitted",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

// == Job Update ==
/// A state change reported while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    /// Position of the reference in the (de-duplicated) input
    pub index: usize,
    pub reference: String,
    pub state: JobState,
}

// == Job Result ==
/// Final outcome for one reference. Produced exactly once per job.
#[derive(Debug, Clone)]
pub struct JobResult {
    index: usize,
    reference: String,
    outcome: Result<String, JobError>,
    from_cache: bool,
    elapsed: Duration,
}

impl JobResult {
    pub fn succeeded(
        index: usize,
        reference: impl Into<String>,
        artifact: String,
        from_cache: bool,
        elapsed: Duration,
    ) -> Self {
        Self {
            index,
            reference: reference.into(),
            outcome: Ok(artifact),
            from_cache,
            elapsed,
        }
    }

    pub fn failed(
        index: usize,
        reference: impl Into<String>,
        error: JobError,
        elapsed: Duration,
    ) -> Self {
        Self {
            index,
            reference: reference.into(),
            outcome: Err(error),
            from_cache: false,
            elapsed,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn artifact(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(String::as_str)
    }

    pub fn error(&self) -> Option<&JobError> {
        self.outcome.as_ref().err()
    }

    /// True when the artifact was served from the cache.
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn state(&self) -> JobState {
        if self.is_success() {
            JobState::Succeeded
        } else {
            JobState::Failed
        }
    }
}
