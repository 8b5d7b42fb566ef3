//! Transcripts
//!
//! Timed subtitle segments, the yt-dlp `json3` reader, and text cleanup.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));
static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])\s*([A-Z])").expect("valid regex"));
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,，.。!！?？;；:：])").expect("valid regex"));
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?。！？]").expect("valid regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Number of entries in `TextStats::top_words`
const TOP_WORDS: usize = 10;

// == Segment ==
/// One timed line of subtitles.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start_ms: u64,
    pub duration_ms: u64,
    pub text: String,
}

// == Transcript ==
/// Subtitle track for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Parses a yt-dlp `json3` subtitle document.
    pub fn from_json3(language: &str, raw: &str) -> Result<Self, ExtractError> {
        let doc: Json3Document = serde_json::from_str(raw).map_err(|e| {
            ExtractError::TransientError(format!("unreadable {} subtitles: {}", language, e))
        })?;

        let segments = doc
            .events
            .into_iter()
            .filter_map(|event| {
                let text: String = event.segs.into_iter().map(|seg| seg.utf8).collect();
                let text = text.trim();
                (!text.is_empty()).then(|| Segment {
                    start_ms: event.t_start_ms,
                    duration_ms: event.d_duration_ms,
                    text: text.to_string(),
                })
            })
            .collect();

        Ok(Self {
            language: language.to_string(),
            segments,
        })
    }

    /// Joins the segments into plain prose with subtitle noise removed.
    pub fn clean_text(&self) -> String {
        let pieces: Vec<String> = self
            .segments
            .iter()
            .map(|segment| clean_segment(&segment.text))
            .filter(|text| !text.is_empty())
            .collect();

        let joined = pieces.join(" ");
        let collapsed = WHITESPACE.replace_all(&joined, " ");
        let punctuated = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "${1}");
        SENTENCE_END
            .replace_all(&punctuated, "${1}\n${2}")
            .trim()
            .to_string()
    }

    /// End of the last segment, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.segments
            .last()
            .map(|s| (s.start_ms + s.duration_ms) as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

// == Text Stats ==
/// Basic counts over a cleaned transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    /// Whitespace-separated tokens
    pub word_count: usize,
    pub char_count: usize,
    pub char_count_no_spaces: usize,
    pub sentence_count: usize,
    /// Non-blank lines
    pub paragraph_count: usize,
    /// Rounded to two decimals, 0.0 without sentences
    pub avg_words_per_sentence: f64,
    /// Most frequent lowercase words longer than one character, with counts
    pub top_words: Vec<(String, usize)>,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let sentence_count = SENTENCE_SPLIT
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();

        let avg_words_per_sentence = if sentence_count > 0 {
            (word_count as f64 / sentence_count as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            word_count,
            char_count: text.chars().count(),
            char_count_no_spaces: text.chars().filter(|&c| c != ' ').count(),
            sentence_count,
            paragraph_count: text.lines().filter(|l| !l.trim().is_empty()).count(),
            avg_words_per_sentence,
            top_words: top_words(text),
        }
    }
}

// == Utility Functions ==
/// Ties are broken alphabetically so the ranking is stable.
fn top_words(text: &str) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for word in WORD.find_iter(&lowered).map(|m| m.as_str()) {
        if word.chars().count() > 1 {
            *freq.entry(word).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = freq
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_WORDS);
    ranked
}

/// Drops `[Music]`-style cues, parentheticals and markup from one line.
fn clean_segment(text: &str) -> String {
    let text = BRACKETED.replace_all(text, "");
    let text = PARENTHESIZED.replace_all(&text, "");
    let text = MARKUP.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

// == json3 Wire Format ==
#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}
