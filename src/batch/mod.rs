//! Batch Module
//!
//! Concurrent analysis of many videos under one analysis type.
//!
//! Jobs run on tokio tasks gated by a semaphore; the caller awaits the whole
//! batch and receives one result per distinct reference.

mod dispatcher;
mod job;
mod payload;

// Re-export public types
pub use dispatcher::{Analyzed, BatchOptions, BatchReport, Dispatcher};
pub use job::{JobResult, JobState, JobUpdate};
pub use payload::merge_payload;
