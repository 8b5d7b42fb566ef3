//! tubeprompt - YouTube transcripts wrapped in AI analysis prompts
//!
//! Prints the prompt-ready text to stdout (or a file) so it can be pasted
//! into any AI chat.

mod cli;
mod session;

use clap::Parser;
use console::style;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, OutputFormat};
use session::{print_menu, print_stats, Session};
use tubeprompt::{Analyzer, Config};

/// Main entry point for the tubeprompt CLI.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr, so stdout stays clean)
/// 2. Load configuration from environment variables, then apply CLI flags
/// 3. Create the analyzer with its own cache
/// 4. Run the one-shot command, a single analysis, a batch, or a session
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "warn" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubeprompt=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    cli.apply(&mut config);

    let analyzer = Analyzer::from_config(config);
    let config = analyzer.config();
    info!(
        "Configuration loaded: cache_max_entries={}, max_workers={}, sub_langs={:?}",
        config.cache_max_entries, config.max_workers, config.sub_langs
    );

    // The cache only lives as long as this process, so these are mostly
    // useful inside an interactive session
    if cli.list_types {
        print_menu();
        return Ok(());
    }
    if cli.clear_cache {
        analyzer.clear_cache().await;
        eprintln!("{} Cache cleared", style("✓").green().bold());
        return Ok(());
    }
    if cli.cache_stats {
        let stats = analyzer.cache_stats().await;
        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_stats(&stats);
        }
        return Ok(());
    }

    let mut session = Session::new(
        analyzer,
        cli.analysis,
        cli.output.clone(),
        cli.format,
        cli.batch_timeout(),
    );

    let ok = match cli.videos.as_slice() {
        [] => {
            session.interactive().await?;
            true
        }
        [reference] => session.run_single(reference).await?,
        references => session.run_batch(references).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
