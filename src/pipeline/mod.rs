//! Process run mode
//!
//! There is a single mode: reuse the dataset file when it exists, otherwise
//! crawl from scratch, then always report. A reused dataset is never
//! partially refreshed.

use crate::config::Config;
use crate::crawler::crawl;
use crate::dataset::{read_dataset, Dataset};
use crate::output::{generate_report, YearStats};
use crate::TopReelError;
use chrono::Datelike;
use std::path::Path;

/// Where the reported dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSource {
    /// Loaded from an existing dataset file
    Loaded,
    /// Produced by a fresh crawl
    Crawled,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub source: DatasetSource,
    pub dataset: Dataset,
    pub stats: YearStats,
}

/// Runs the pipeline: load or crawl, then report
///
/// # Example
///
/// ```no_run
/// use top_reel::{run_pipeline, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_pipeline(Config::default()).await?;
/// println!("{} movies", summary.stats.total_movies);
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(config: Config) -> Result<PipelineSummary, TopReelError> {
    config.output.create_dirs()?;

    let dataset_path = Path::new(&config.output.dataset_path);
    let (source, dataset) = if dataset_path.exists() {
        tracing::info!("Found existing dataset: {}", dataset_path.display());
        let dataset = read_dataset(dataset_path)?;
        tracing::info!(
            "Loaded {} movie records; delete the file to crawl again",
            dataset.len()
        );
        (DatasetSource::Loaded, dataset)
    } else {
        tracing::info!("No dataset at {}, crawling", dataset_path.display());
        let dataset = crawl(config.clone()).await?;
        (DatasetSource::Crawled, dataset)
    };

    tracing::info!("Analyzing {} records", dataset.len());
    let current_year = chrono::Local::now().year();
    let stats = generate_report(&dataset, &config.output, current_year)?;

    Ok(PipelineSummary {
        source,
        dataset,
        stats,
    })
}
