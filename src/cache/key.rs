//! Cache Key Module
//!
//! Fingerprinted keys derived from a (video id, analysis type) pair.

use std::fmt;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::models::AnalysisType;

// == Cache Key ==
/// Key for one rendered artifact.
///
/// Equality covers the readable parts as well as the tag, so two different
/// pairs never compare equal even if their tags collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    video_id: String,
    analysis: AnalysisType,
    tag: String,
}

impl CacheKey {
    // == Constructor ==
    /// Derives the key for a video id and analysis type.
    pub fn new(video_id: &str, analysis: AnalysisType) -> Self {
        Self {
            video_id: video_id.to_string(),
            analysis,
            tag: fingerprint(video_id, analysis),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn analysis(&self) -> AnalysisType {
        self.analysis
    }

    /// Short hex tag of the pair.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.video_id, self.analysis, self.tag)
    }
}

// == Utility Functions ==
/// 8 hex chars of a fast non-cryptographic hash over `video_id + analysis`.
fn fingerprint(video_id: &str, analysis: AnalysisType) -> String {
    let mut hasher = DefaultHasher::new();
    video_id.hash(&mut hasher);
    analysis.as_str().hash(&mut hasher);
    format!("{:08x}", hasher.finish() as u32)
}
