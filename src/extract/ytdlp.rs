//! yt-dlp Source
//!
//! Subtitle download through the `yt-dlp` executable.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::{fs, process::Command};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ExtractError;
use crate::extract::{Transcript, TranscriptSource};
use crate::models::VideoId;

/// stderr fragments yt-dlp prints when the video itself cannot be reached
const NOT_FOUND_MARKERS: [&str; 7] = [
    "Video unavailable",
    "Private video",
    "This video has been removed",
    "is not a valid URL",
    "Incomplete YouTube ID",
    "HTTP Error 404",
    "members-only content",
];

// == yt-dlp Source ==
/// Downloads subtitles (manual or auto-generated) as `json3` into a scratch
/// directory and reads back the best language available.
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    program: String,
    sub_langs: Vec<String>,
    scratch_root: PathBuf,
    timeout: Duration,
}

impl YtDlpSource {
    pub fn new(program: impl Into<String>, sub_langs: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            sub_langs,
            scratch_root: default_scratch_root(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ytdlp_program.clone(),
            config.sub_langs.clone(),
            config.fetch_timeout,
        )
    }

    /// Places per-job scratch directories under `root` instead of the user cache dir.
    #[cfg(test)]
    fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    async fn download(&self, video: &VideoId, scratch: &Path) -> Result<Transcript, ExtractError> {
        fs::create_dir_all(scratch).await?;

        let output_template = scratch.join("%(id)s.%(ext)s");
        let mut command = Command::new(&self.program);
        command
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs")
            .arg(self.sub_langs.join(","))
            .arg("--sub-format")
            .arg("json3")
            .arg("--no-warnings")
            .arg("-o")
            .arg(&output_template)
            .arg(video.watch_url())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                ExtractError::TransientError(format!(
                    "yt-dlp did not finish within {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                ExtractError::TransientError(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(video, &stderr));
        }

        let (language, path) = self
            .pick_subtitle_file(video, scratch)
            .await?
            .ok_or_else(|| {
                ExtractError::NoTranscript(format!(
                    "no subtitles in [{}] for {}",
                    self.sub_langs.join(", "),
                    video
                ))
            })?;

        debug!(video = %video, language = %language, "reading subtitles");
        let raw = fs::read_to_string(&path).await?;
        Transcript::from_json3(&language, &raw)
    }

    /// Finds `<id>.<lang>.json3` for the most preferred language present.
    async fn pick_subtitle_file(
        &self,
        video: &VideoId,
        scratch: &Path,
    ) -> Result<Option<(String, PathBuf)>, ExtractError> {
        let prefix = format!("{}.", video);
        let mut found: Vec<(String, PathBuf)> = Vec::new();

        let mut entries = fs::read_dir(scratch).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(language) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json3"))
            {
                found.push((language.to_string(), entry.path()));
            }
        }

        Ok(pick_preferred(&self.sub_langs, found))
    }
}

// == Transcript Source ==
#[async_trait]
impl TranscriptSource for YtDlpSource {
    async fn fetch(&self, video: &VideoId) -> Result<Transcript, ExtractError> {
        let scratch = self
            .scratch_root
            .join(format!("{}-{}", video, uuid::Uuid::new_v4()));

        let result = self.download(video, &scratch).await;

        if let Err(e) = fs::remove_dir_all(&scratch).await {
            debug!(path = %scratch.display(), error = %e, "scratch cleanup failed");
        }

        if let Ok(transcript) = &result {
            info!(
                video = %video,
                language = %transcript.language,
                segments = transcript.segments.len(),
                duration_secs = transcript.duration_secs(),
                "subtitles fetched"
            );
        }
        result
    }
}

// == Utility Functions ==
fn default_scratch_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tubeprompt")
        .join("subs")
}

fn classify_failure(video: &VideoId, stderr: &str) -> ExtractError {
    let reason = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("yt-dlp exited with an error")
        .trim()
        .to_string();

    if NOT_FOUND_MARKERS.iter().any(|marker| stderr.contains(marker)) {
        ExtractError::NotFound(format!("{}: {}", video, reason))
    } else {
        ExtractError::TransientError(reason)
    }
}

/// Picks the first preferred language present, else the alphabetically first file.
fn pick_preferred(
    preferred: &[String],
    mut found: Vec<(String, PathBuf)>,
) -> Option<(String, PathBuf)> {
    for language in preferred {
        if let Some(pos) = found.iter().position(|(lang, _)| lang == language) {
            return Some(found.swap_remove(pos));
        }
    }
    found.sort();
    found.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    fn langs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_unavailable_as_not_found() {
        let stderr = "ERROR: [youtube] dQw4w9WgXcQ: Video unavailable\n";
        let err = classify_failure(&video(), stderr);
        assert!(matches!(err, ExtractError::NotFound(_)));
        assert!(err.to_string().contains("Video unavailable"));
    }

    #[test]
    fn test_classify_other_errors_as_transient() {
        let err = classify_failure(&video(), "ERROR: Unable to download webpage: timed out\n\n");
        assert_eq!(
            err,
            ExtractError::TransientError("ERROR: Unable to download webpage: timed out".to_string())
        );
    }

    #[test]
    fn test_pick_preferred_follows_preference_order() {
        let found = vec![
            ("en".to_string(), PathBuf::from("a.en.json3")),
            ("zh-TW".to_string(), PathBuf::from("a.zh-TW.json3")),
        ];
        let (lang, _) = pick_preferred(&langs(&["zh-TW", "en"]), found).unwrap();
        assert_eq!(lang, "zh-TW");
    }

    #[test]
    fn test_pick_preferred_falls_back_to_any() {
        let found = vec![
            ("ja".to_string(), PathBuf::from("a.ja.json3")),
            ("de".to_string(), PathBuf::from("a.de.json3")),
        ];
        let (lang, _) = pick_preferred(&langs(&["en"]), found).unwrap();
        assert_eq!(lang, "de");
        assert!(pick_preferred(&langs(&["en"]), Vec::new()).is_none());
    }

    #[tokio::test]
    async fn test_missing_program_is_transient() {
        let scratch = std::env::temp_dir().join(format!("tubeprompt-test-{}", uuid::Uuid::new_v4()));
        let source = YtDlpSource::new(
            "tubeprompt-no-such-program",
            langs(&["en"]),
            Duration::from_secs(5),
        )
        .with_scratch_root(&scratch);

        let err = source.fetch(&video()).await.unwrap_err();

        assert!(matches!(err, ExtractError::TransientError(_)));
        let _ = std::fs::remove_dir_all(&scratch);
    }

    #[tokio::test]
    async fn test_pick_subtitle_file_reads_scratch_dir() {
        let scratch = std::env::temp_dir().join(format!("tubeprompt-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&scratch).unwrap();
        std::fs::write(scratch.join("dQw4w9WgXcQ.en.json3"), "{}").unwrap();
        std::fs::write(scratch.join("dQw4w9WgXcQ.zh-TW.json3"), "{}").unwrap();
        std::fs::write(scratch.join("other.txt"), "").unwrap();

        let source = YtDlpSource::new("yt-dlp", langs(&["zh-TW", "en"]), Duration::from_secs(5));
        let (lang, path) = source
            .pick_subtitle_file(&video(), &scratch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(lang, "zh-TW");
        assert!(path.ends_with("dQw4w9WgXcQ.zh-TW.json3"));
        std::fs::remove_dir_all(&scratch).unwrap();
    }
}
