//! tubeprompt - YouTube transcripts wrapped in AI analysis prompts
//!
//! Extracts a video's subtitles, cleans them, and wraps them in one of a fixed
//! set of analysis prompts. Batches run concurrently and share an in-memory
//! result cache with insertion-order eviction.

pub mod analyzer;
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;

pub use analyzer::Analyzer;
pub use batch::{BatchOptions, BatchReport};
pub use config::Config;
pub use models::{AnalysisType, VideoId};
