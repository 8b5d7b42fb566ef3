//! Command-line arguments
//!
//! Flags layered on top of the environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use tubeprompt::{AnalysisType, Config};

// == Output Format ==
/// How results are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// The artifact or merged payload as plain text
    #[default]
    Text,
    /// A JSON document with the text, video info, prompt type and statistics
    Json,
}

// == Cli ==
#[derive(Parser, Debug)]
#[command(name = "tubeprompt")]
#[command(
    about = "Wrap YouTube transcripts in AI analysis prompts, one video or a whole batch"
)]
#[command(version)]
pub struct Cli {
    /// Video URLs or ids. One runs a single analysis, several run a batch,
    /// none starts an interactive session
    pub videos: Vec<String>,

    /// Analysis type (see --list-types). Asked interactively when omitted
    #[arg(short = 't', long = "type")]
    pub analysis: Option<AnalysisType>,

    /// Number of videos processed at once in a batch
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Give up on unfinished batch jobs after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Cache size threshold for this run
    #[arg(long)]
    pub cache_size: Option<usize>,

    /// List the analysis types and exit
    #[arg(long)]
    pub list_types: bool,

    /// Print cache statistics and exit
    #[arg(long)]
    pub cache_stats: bool,

    /// Clear the cache and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Output format for results and --cache-stats
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Overrides environment-derived settings with explicit flags.
    pub fn apply(&self, config: &mut Config) {
        if let Some(workers) = self.workers.filter(|&n| n > 0) {
            config.max_workers = workers;
        }
        if let Some(size) = self.cache_size {
            config.cache_max_entries = size;
        }
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_invocation() {
        let cli = Cli::parse_from([
            "tubeprompt",
            "-t",
            "fact_check",
            "-w",
            "2",
            "--timeout",
            "30",
            "https://youtu.be/dQw4w9WgXcQ",
            "aaaaaaaaaaa",
        ]);

        assert_eq!(cli.analysis, Some(AnalysisType::FactCheck));
        assert_eq!(cli.videos.len(), 2);
        assert_eq!(cli.batch_timeout(), Some(Duration::from_secs(30)));

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.max_workers, 2);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Cli::try_parse_from(["tubeprompt", "-t", "horoscope"]).is_err());
    }

    #[test]
    fn test_format_defaults_to_text() {
        let cli = Cli::parse_from(["tubeprompt"]);
        assert_eq!(cli.format, OutputFormat::Text);

        let cli = Cli::parse_from(["tubeprompt", "--format", "json", "dQw4w9WgXcQ"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(Cli::try_parse_from(["tubeprompt", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_zero_workers_flag_is_ignored() {
        let cli = Cli::parse_from(["tubeprompt", "-w", "0"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.max_workers, 4);
    }
}
