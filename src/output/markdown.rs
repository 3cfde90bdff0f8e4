//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of the year
//! distribution, next to the rendered chart.

use crate::output::stats::YearStats;
use crate::TopReelError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary to `output_path`
pub fn generate_markdown_summary(stats: &YearStats, output_path: &Path) -> Result<(), TopReelError> {
    let markdown = format_markdown_summary(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats year statistics as markdown
pub fn format_markdown_summary(stats: &YearStats) -> String {
    let mut md = String::new();

    md.push_str("# Douban Top 250 Year Distribution\n\n");

    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **Records**: {}\n", stats.total_records));
    md.push_str(&format!(
        "- **Movies with a valid year**: {}\n",
        stats.total_movies
    ));
    if stats.invalid_records() > 0 {
        md.push_str(&format!(
            "- **Records without a valid year**: {}\n",
            stats.invalid_records()
        ));
    }

    match (stats.earliest_year, stats.latest_year, stats.peak_year) {
        (Some(earliest), Some(latest), Some(peak)) => {
            md.push_str(&format!("- **Earliest year**: {}\n", earliest));
            md.push_str(&format!("- **Latest year**: {}\n", latest));
            md.push_str(&format!(
                "- **Peak year**: {} ({} movies)\n\n",
                peak, stats.peak_count
            ));
        }
        _ => {
            md.push_str("\nNo valid release years were found.\n");
            return md;
        }
    }

    md.push_str("## Movies per Year\n\n");
    md.push_str("| Year | Movies |\n");
    md.push_str("|------|--------|\n");
    for (year, count) in &stats.counts {
        md.push_str(&format!("| {} | {} |\n", year, count));
    }

    md
}
