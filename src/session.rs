//! Terminal session
//!
//! Menu, spinners, summaries and delivery of results for the CLI.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

use tubeprompt::batch::{Analyzed, JobState, JobUpdate};
use tubeprompt::cache::CacheStats;
use tubeprompt::extract::{transcript_section, TextStats};
use tubeprompt::models::{ArtifactDocument, BatchDocument};
use tubeprompt::{AnalysisType, Analyzer, BatchReport};

use crate::cli::OutputFormat;

const PREVIEW_LINES: usize = 10;
const SHOWN_TOP_WORDS: usize = 5;

// == Session ==
/// Drives the analyzer from the terminal.
pub struct Session {
    analyzer: Analyzer,
    preset: Option<AnalysisType>,
    output: Option<PathBuf>,
    format: OutputFormat,
    timeout: Option<Duration>,
    input: Lines<BufReader<Stdin>>,
}

impl Session {
    pub fn new(
        analyzer: Analyzer,
        preset: Option<AnalysisType>,
        output: Option<PathBuf>,
        format: OutputFormat,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            analyzer,
            preset,
            output,
            format,
            timeout,
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    // == Interactive ==
    /// Reads references line by line until `:quit` or end of input.
    pub async fn interactive(&mut self) -> Result<()> {
        eprintln!(
            "\n{}  {}",
            style("tubeprompt").cyan().bold(),
            style("paste one or more video URLs per line, :help for commands").dim()
        );

        loop {
            eprint!("{} ", style(">").cyan().bold());
            let Some(line) = self.input.next_line().await? else {
                break;
            };

            match line.trim() {
                "" => continue,
                ":q" | ":quit" | ":exit" => break,
                ":help" => print_help(),
                ":types" => print_menu(),
                ":stats" => print_stats(&self.analyzer.cache_stats().await),
                ":clear" => {
                    self.analyzer.clear_cache().await;
                    eprintln!("{} Cache cleared", style("✓").green().bold());
                }
                command if command.starts_with(':') => {
                    eprintln!("{} Unknown command {}", style("✗").red().bold(), command);
                }
                refs => {
                    let refs: Vec<String> = refs.split_whitespace().map(str::to_string).collect();
                    if refs.len() == 1 {
                        self.run_single(&refs[0]).await?;
                    } else {
                        self.run_batch(&refs).await?;
                    }
                }
            }
        }
        Ok(())
    }

    // == Single Video ==
    /// Returns whether an artifact was delivered.
    pub async fn run_single(&mut self, reference: &str) -> Result<bool> {
        let Some(analysis) = self.select_analysis().await? else {
            return Ok(false);
        };

        let spinner = create_spinner(&format!("Extracting transcript for {}...", reference));
        let analyzed = match self.analyzer.analyze_video(reference, analysis).await {
            Ok(analyzed) => analyzed,
            Err(e) => {
                spinner.finish_with_message(format!("{} {}", style("✗").red().bold(), e));
                return Ok(false);
            }
        };

        let note = if analyzed.from_cache { " (cached)" } else { "" };
        spinner.finish_with_message(format!(
            "{} {} ready: {} characters{}",
            style("✓").green().bold(),
            analysis.display_name(),
            analyzed.artifact.chars().count(),
            style(note).dim()
        ));
        print_text_stats(&TextStats::from_text(transcript_section(&analyzed.artifact)));
        print_preview(&analyzed.artifact);

        let body = match self.format {
            OutputFormat::Text => analyzed.artifact.clone(),
            OutputFormat::Json => single_document(reference, analysis, &analyzed)?,
        };
        self.deliver(&body).await?;
        Ok(true)
    }

    // == Batch ==
    /// Returns whether at least one video succeeded.
    pub async fn run_batch(&mut self, references: &[String]) -> Result<bool> {
        let Some(analysis) = self.select_analysis().await? else {
            return Ok(false);
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let mut options = self.analyzer.batch_options();
        options.timeout = self.timeout;
        options.progress = Some(tx);

        let distinct = distinct_count(references);
        eprintln!(
            "{} Analyzing {} videos with {} workers",
            style("→").cyan().bold(),
            distinct,
            options.max_workers
        );
        let bar = create_progress_bar(distinct as u64);
        let watcher = tokio::spawn(track_progress(bar.clone(), rx));

        let report = self
            .analyzer
            .analyze_batch(references, analysis, &options)
            .await?;
        drop(options);
        let _ = watcher.await;
        bar.finish_and_clear();

        print_batch_summary(&report);
        match self.format {
            OutputFormat::Text => {
                if let Some(payload) = &report.payload {
                    self.deliver(payload).await?;
                }
            }
            // Failed batches still get a document listing the reasons
            OutputFormat::Json => {
                let doc = serde_json::to_string_pretty(&BatchDocument::new(&report, Utc::now()))?;
                self.deliver(&doc).await?;
            }
        }
        Ok(!report.is_total_failure())
    }

    async fn select_analysis(&mut self) -> Result<Option<AnalysisType>> {
        if let Some(preset) = self.preset {
            return Ok(Some(preset));
        }

        print_menu();
        let cancel = AnalysisType::ALL.len() + 1;
        eprint!("Choose 1-{} ({} cancels): ", cancel, cancel);

        let Some(line) = self.input.next_line().await? else {
            return Ok(None);
        };
        let choice = line.trim();

        let selected = match choice.parse::<usize>() {
            Ok(n) if (1..cancel).contains(&n) => Some(AnalysisType::ALL[n - 1]),
            Ok(_) => None,
            Err(_) => choice.parse::<AnalysisType>().ok(),
        };

        match selected {
            Some(analysis) => eprintln!(
                "{} Selected: {}",
                style("✓").green().bold(),
                analysis.display_name()
            ),
            None => eprintln!("{} No analysis type selected", style("✗").red().bold()),
        }
        Ok(selected)
    }

    async fn deliver(&self, body: &str) -> Result<()> {
        match &self.output {
            Some(path) => {
                tokio::fs::write(path, body)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!(
                    "{} {}",
                    style("Saved:").dim(),
                    style(path.display()).cyan()
                );
            }
            None => println!("{}", body),
        }
        Ok(())
    }
}

// == Helper Functions ==
fn single_document(reference: &str, analysis: AnalysisType, analyzed: &Analyzed) -> Result<String> {
    let doc = ArtifactDocument::new(reference, analysis, analyzed, Utc::now());
    Ok(serde_json::to_string_pretty(&doc)?)
}

async fn track_progress(bar: ProgressBar, mut rx: mpsc::UnboundedReceiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        if update.state == JobState::Running {
            bar.set_message(short(&update.reference));
        }
        if update.state == JobState::Failed {
            bar.println(format!(
                "{} {}",
                style("✗").red().bold(),
                short(&update.reference)
            ));
        }
        if update.state.is_terminal() {
            bar.inc(1);
        }
    }
}

/// Number of jobs a batch will run; repeated references collapse into one.
fn distinct_count(references: &[String]) -> usize {
    references.iter().collect::<HashSet<_>>().len()
}

fn short(reference: &str) -> String {
    let mut shown: String = reference.chars().take(50).collect();
    if reference.chars().count() > 50 {
        shown.push('…');
    }
    shown
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// == Printing ==
pub fn print_menu() {
    eprintln!("\n{}", style("Analysis types:").bold());
    for (i, analysis) in AnalysisType::ALL.iter().enumerate() {
        eprintln!(
            "{:2}. {} {}",
            i + 1,
            style(analysis.display_name()).cyan(),
            style(format!("[{}]", analysis)).dim()
        );
        eprintln!("    {}", analysis.description());
    }
    eprintln!("{:2}. Cancel", AnalysisType::ALL.len() + 1);
}

pub fn print_stats(stats: &CacheStats) {
    eprintln!(
        "{} {}/{} cached artifacts ({:.0}% full), {} characters, {} evicted",
        style("Cache:").bold(),
        stats.total_entries,
        stats.max_entries,
        stats.fill_ratio() * 100.0,
        stats.total_chars,
        stats.evictions
    );
    if stats.is_empty() {
        return;
    }
    if let Some(oldest) = stats.oldest_inserted_at {
        eprintln!("  oldest entry from {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    for key in &stats.keys {
        eprintln!("  {}", style(key).dim());
    }
}

fn print_text_stats(stats: &TextStats) {
    eprintln!(
        "{} {} words, {} sentences, {} paragraphs, {:.2} words per sentence",
        style("Transcript:").bold(),
        stats.word_count,
        stats.sentence_count,
        stats.paragraph_count,
        stats.avg_words_per_sentence
    );
    if !stats.top_words.is_empty() {
        let top: Vec<String> = stats
            .top_words
            .iter()
            .take(SHOWN_TOP_WORDS)
            .map(|(word, count)| format!("{} ({})", word, count))
            .collect();
        eprintln!("  {} {}", style("Top words:").dim(), top.join(", "));
    }
}

fn print_help() {
    eprintln!("  <url> [<url>...]  analyze one video, or several as a batch");
    eprintln!("  :types            list analysis types");
    eprintln!("  :stats            show cache statistics");
    eprintln!("  :clear            clear the cache");
    eprintln!("  :quit             leave");
}

fn print_preview(artifact: &str) {
    let lines: Vec<&str> = artifact.lines().collect();
    eprintln!("{}", style("─".repeat(60)).dim());
    for line in lines.iter().take(PREVIEW_LINES) {
        eprintln!("{}", style(line).dim());
    }
    if lines.len() > PREVIEW_LINES {
        eprintln!("{}", style(format!("... ({} more lines)", lines.len() - PREVIEW_LINES)).dim());
    }
    eprintln!("{}", style("─".repeat(60)).dim());
}

fn print_batch_summary(report: &BatchReport) {
    let per_video = if report.attempted > 0 {
        report.elapsed.as_secs_f64() / report.attempted as f64
    } else {
        0.0
    };

    eprintln!(
        "\n{} {}/{} succeeded in {:.1}s ({:.1}s per video, {} from cache)",
        style("Batch:").bold(),
        report.succeeded(),
        report.attempted,
        report.elapsed.as_secs_f64(),
        per_video,
        report.cache_hits()
    );
    for failure in report.failures() {
        let reason = failure
            .error()
            .map(ToString::to_string)
            .unwrap_or_default();
        eprintln!(
            "  {} {}: {}",
            style("✗").red().bold(),
            failure.reference(),
            reason
        );
    }
    if report.is_total_failure() {
        eprintln!("{} No video could be analyzed", style("✗").red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubeprompt::VideoId;

    #[test]
    fn test_short_truncates_long_references() {
        let long = "x".repeat(80);
        let shown = short(&long);
        assert_eq!(shown.chars().count(), 51);
        assert!(shown.ends_with('…'));
        assert_eq!(short("abc"), "abc");
    }

    #[test]
    fn test_distinct_count_collapses_repeats() {
        let refs: Vec<String> = ["a", "b", "a", "c", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(distinct_count(&refs), 3);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[tokio::test]
    async fn test_progress_bar_reaches_distinct_total() {
        let refs: Vec<String> = ["a", "a", "b"].iter().map(|s| s.to_string()).collect();
        let bar = ProgressBar::hidden();
        bar.set_length(distinct_count(&refs) as u64);

        let (tx, rx) = mpsc::unbounded_channel();
        for (index, reference, state) in [
            (0, "a", JobState::Submitted),
            (1, "b", JobState::Submitted),
            (0, "a", JobState::Running),
            (0, "a", JobState::Succeeded),
            (1, "b", JobState::Running),
            (1, "b", JobState::Failed),
        ] {
            tx.send(JobUpdate {
                index,
                reference: reference.to_string(),
                state,
            })
            .unwrap();
        }
        drop(tx);

        track_progress(bar.clone(), rx).await;
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(2));
    }

    #[test]
    fn test_single_document_is_json() {
        let video = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let analyzed = Analyzed {
            video,
            artifact: "Full video transcript:\n----------------------------------------\nHi there."
                .to_string(),
            from_cache: false,
        };

        let body = single_document("dQw4w9WgXcQ", AnalysisType::Summary, &analyzed).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["prompt_type"], "summary");
        assert_eq!(json["stats"]["word_count"], 2);
    }
}
