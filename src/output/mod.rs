//! Output module for reporting on a dataset
//!
//! This module handles:
//! - Computing the release-year distribution
//! - Rendering the distribution chart
//! - Writing the markdown summary and printing console statistics

mod chart;
mod markdown;
pub mod stats;

pub use chart::render_year_chart;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{compute_year_stats, parse_year, print_statistics, YearStats};

use crate::config::OutputConfig;
use crate::dataset::Dataset;
use crate::TopReelError;
use std::path::Path;

/// Computes year statistics and writes the chart and markdown summary
///
/// A dataset without any valid year still gets a summary; only the chart is
/// skipped.
///
/// # Arguments
///
/// * `dataset` - Records to report on
/// * `output` - Where the chart and summary go
/// * `current_year` - Upper bound (plus one) for plausible release years
pub fn generate_report(
    dataset: &Dataset,
    output: &OutputConfig,
    current_year: i32,
) -> Result<YearStats, TopReelError> {
    let stats = compute_year_stats(dataset, current_year);

    if stats.counts.is_empty() {
        tracing::warn!("No valid release years in the dataset, skipping chart");
    } else {
        let chart_path = Path::new(&output.chart_path);
        render_year_chart(&stats, chart_path)?;
        tracing::info!("Year distribution chart saved to {}", chart_path.display());
    }

    let summary_path = Path::new(&output.summary_path);
    generate_markdown_summary(&stats, summary_path)?;
    tracing::info!("Summary saved to {}", summary_path.display());

    Ok(stats)
}
