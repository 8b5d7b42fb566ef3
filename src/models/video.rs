//! Video references
//!
//! Turns the many shapes of a YouTube link into a bare video id.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::ExtractError;

static VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

/// An 11-character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extracts the video id from a URL or a bare id.
    ///
    /// Accepts `watch?v=`, `youtu.be/`, `/embed/`, `/v/` and `/shorts/` links.
    pub fn parse(reference: &str) -> Result<Self, ExtractError> {
        let reference = reference.trim();

        if VIDEO_ID.is_match(reference) {
            return Ok(Self(reference.to_string()));
        }

        let candidate = Self::from_url(reference).ok_or_else(|| {
            ExtractError::NotFound(format!("cannot extract a video id from '{}'", reference))
        })?;

        if VIDEO_ID.is_match(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(ExtractError::NotFound(format!(
                "'{}' is not a valid video id",
                candidate
            )))
        }
    }

    fn from_url(reference: &str) -> Option<String> {
        // Scheme-less links like "youtu.be/abc" are common in pasted text
        let parsed = Url::parse(reference)
            .or_else(|_| Url::parse(&format!("https://{}", reference)))
            .ok()?;
        let host = parsed.host_str()?.trim_start_matches("www.").to_ascii_lowercase();
        let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

        if host == "youtu.be" {
            return segments.next().map(str::to_string);
        }

        if host != "youtube.com" && !host.ends_with(".youtube.com") {
            return None;
        }

        match segments.next()? {
            "watch" => parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            "embed" | "v" | "shorts" | "live" => segments.next().map(str::to_string),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_parse_bare_id() {
        assert_eq!(VideoId::parse(ID).unwrap().as_str(), ID);
    }

    #[test]
    fn test_parse_watch_url_with_extra_params() {
        let id = VideoId::parse("https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ&t=30").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn test_parse_short_link() {
        let id = VideoId::parse("https://youtu.be/dQw4w9WgXcQ?t=30").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn test_parse_embed_shorts_and_v_paths() {
        for link in [
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "http://www.youtube.com/v/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(VideoId::parse(link).unwrap().as_str(), ID, "{}", link);
        }
    }

    #[test]
    fn test_parse_without_scheme() {
        let id = VideoId::parse("youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        let err = VideoId::parse("https://vimeo.com/123456789").unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[test]
    fn test_parse_rejects_playlist_and_garbage() {
        assert!(VideoId::parse("https://www.youtube.com/playlist?list=PL1").is_err());
        assert!(VideoId::parse("not a video").is_err());
        assert!(VideoId::parse("").is_err());
    }

    #[test]
    fn test_watch_url() {
        let id = VideoId::parse(ID).unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
