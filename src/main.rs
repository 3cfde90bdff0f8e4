//! Top-Reel main entry point
//!
//! This is the command-line interface for the Top-Reel movie list harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use top_reel::config::{load_config_with_hash, Config};
use top_reel::output::print_statistics;
use top_reel::{run_pipeline, DatasetSource};
use tracing_subscriber::EnvFilter;

/// Top-Reel: Douban Top 250 harvester
///
/// Crawls the ranked listing (or reuses the existing dataset file), downloads
/// posters, and reports how the movies spread over release years.
#[derive(Parser, Debug)]
#[command(name = "top-reel")]
#[command(version = "1.0.0")]
#[command(about = "Douban Top 250 harvester", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    let image_dir = config.output.image_dir.clone();
    let dataset_path = config.output.dataset_path.clone();
    let chart_path = config.output.chart_path.clone();

    let summary = match run_pipeline(config).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    if summary.source == DatasetSource::Crawled {
        tracing::info!("Posters saved in {}", image_dir);
    }

    print_statistics(&summary.stats);
    println!("Dataset: {}", dataset_path);
    println!("Chart: {}", chart_path);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("top_reel=info,warn"),
            1 => EnvFilter::new("top_reel=debug,info"),
            2 => EnvFilter::new("top_reel=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
