//! Domain models shared by the cache, the extractor and the dispatcher.

pub mod analysis;
pub mod export;
pub mod video;

// Re-export commonly used types
pub use analysis::AnalysisType;
pub use export::{ArtifactDocument, BatchDocument, BatchVideo, VideoInfo};
pub use video::VideoId;
