//! Crawler module for listing retrieval and poster downloads
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with pacing, retry and raw-response archiving
//! - Listing extraction into movie records
//! - Poster filename derivation and image download
//! - Two-phase coordination over bounded worker pools

mod coordinator;
mod extractor;
mod fetcher;
mod posters;

pub use coordinator::{page_tasks, Coordinator, PageTally, PageTask, PosterReport};
pub use extractor::{
    extract_movies, parse_listing, split_year_region, ParsedListing, SkipReason, SkippedEntry,
};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use posters::{download_poster, poster_file_names, safe_filename, POSTER_EXTENSION};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::TopReelError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a fresh crawl. It will:
/// 1. Create the output directories
/// 2. Build the HTTP client
/// 3. Fetch and extract every listing page
/// 4. Persist the dataset
/// 5. Download the posters
///
/// # Returns
///
/// * `Ok(Dataset)` - The records collected by this crawl
/// * `Err(TopReelError)` - Setup or dataset persistence failed
pub async fn crawl(config: Config) -> Result<Dataset, TopReelError> {
    Coordinator::new(config)?.run().await
}
