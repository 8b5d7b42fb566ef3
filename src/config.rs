//! Configuration Module
//!
//! Handles loading and managing analyzer configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Default number of videos processed at once in a batch
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Default subtitle language preference, most preferred first
pub const DEFAULT_SUB_LANGS: [&str; 4] = ["zh-TW", "zh-CN", "zh", "en"];

/// Analyzer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of artifacts the cache holds before evicting
    pub cache_max_entries: usize,
    /// Default worker count for batch analysis
    pub max_workers: usize,
    /// Subtitle languages to request, most preferred first
    pub sub_langs: Vec<String>,
    /// yt-dlp executable name or path
    pub ytdlp_program: String,
    /// Upper bound on a single yt-dlp run
    pub fetch_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TUBEPROMPT_CACHE_MAX_ENTRIES` - Cache size threshold (default: 50)
    /// - `TUBEPROMPT_MAX_WORKERS` - Batch worker count (default: 4)
    /// - `TUBEPROMPT_SUB_LANGS` - Comma-separated languages (default: zh-TW,zh-CN,zh,en)
    /// - `TUBEPROMPT_YTDLP` - yt-dlp executable (default: yt-dlp)
    /// - `TUBEPROMPT_FETCH_TIMEOUT` - Seconds allowed per yt-dlp run (default: 120)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_max_entries: env::var("TUBEPROMPT_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_entries),
            max_workers: env::var("TUBEPROMPT_MAX_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_workers),
            sub_langs: env::var("TUBEPROMPT_SUB_LANGS")
                .ok()
                .map(|v| parse_lang_list(&v))
                .filter(|langs| !langs.is_empty())
                .unwrap_or(defaults.sub_langs),
            ytdlp_program: env::var("TUBEPROMPT_YTDLP")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.ytdlp_program),
            fetch_timeout: env::var("TUBEPROMPT_FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            max_workers: DEFAULT_MAX_WORKERS,
            sub_langs: DEFAULT_SUB_LANGS.iter().map(|s| s.to_string()).collect(),
            ytdlp_program: "yt-dlp".to_string(),
            fetch_timeout: Duration::from_secs(120),
        }
    }
}

fn parse_lang_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
