//! Year-distribution statistics
//!
//! Year strings are only validated here. Rows whose year does not parse as a
//! plausible release year are left out of every figure except
//! `total_records`.

use crate::dataset::Dataset;
use std::collections::BTreeMap;

/// Years at or before this are not considered plausible release years
const EARLIEST_PLAUSIBLE_YEAR: i32 = 1900;

/// Year statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearStats {
    /// Number of movies per valid release year, ascending by year
    pub counts: BTreeMap<i32, u64>,

    /// Earliest valid year
    pub earliest_year: Option<i32>,

    /// Latest valid year
    pub latest_year: Option<i32>,

    /// Year with the most movies; ties go to the earliest such year
    pub peak_year: Option<i32>,

    /// Number of movies in the peak year
    pub peak_count: u64,

    /// Movies with a valid year
    pub total_movies: u64,

    /// All rows in the dataset
    pub total_records: u64,
}

impl YearStats {
    /// Rows excluded because their year was empty or implausible
    pub fn invalid_records(&self) -> u64 {
        self.total_records - self.total_movies
    }
}

/// Parses a year field, tolerating surrounding whitespace
pub fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Computes year statistics for a dataset
///
/// A year is valid when `1900 < year <= current_year + 1`.
pub fn compute_year_stats(dataset: &Dataset, current_year: i32) -> YearStats {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();

    for year in dataset.iter().filter_map(|record| parse_year(&record.year)) {
        if year > EARLIEST_PLAUSIBLE_YEAR && year <= current_year + 1 {
            *counts.entry(year).or_insert(0) += 1;
        }
    }

    let mut peak: Option<(i32, u64)> = None;
    for (&year, &count) in &counts {
        if peak.map_or(true, |(_, best)| count > best) {
            peak = Some((year, count));
        }
    }

    YearStats {
        earliest_year: counts.keys().next().copied(),
        latest_year: counts.keys().next_back().copied(),
        peak_year: peak.map(|(year, _)| year),
        peak_count: peak.map_or(0, |(_, count)| count),
        total_movies: counts.values().sum(),
        total_records: dataset.len() as u64,
        counts,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &YearStats) {
    println!("{}", "=".repeat(50));
    println!("Data summary:");

    match (stats.earliest_year, stats.latest_year, stats.peak_year) {
        (Some(earliest), Some(latest), Some(peak)) => {
            println!("  Earliest release year: {}", earliest);
            println!("  Latest release year: {}", latest);
            println!(
                "  Year with the most movies: {} ({} movies)",
                peak, stats.peak_count
            );
        }
        _ => println!("  No valid release years in the dataset"),
    }

    println!("  Total movies: {}", stats.total_movies);
    if stats.invalid_records() > 0 {
        println!(
            "  Records without a valid year: {}",
            stats.invalid_records()
        );
    }
    println!("{}", "=".repeat(50));
}
