//! Crawler coordinator - main crawl orchestration logic
//!
//! A crawl runs in two phases, each on its own bounded worker pool:
//! 1. Every listing page is fetched and extracted; records are collected
//! 2. The dataset is persisted, then one poster download runs per record
//!
//! The poster pool only starts once the page pool has drained. A failure in
//! either phase is contained to its page or image.

use crate::archive::RawArchive;
use crate::config::{Config, SourceConfig};
use crate::crawler::extractor::parse_listing;
use crate::crawler::fetcher::{build_http_client, FetchResult, Fetcher};
use crate::crawler::posters::{download_poster, poster_file_names};
use crate::dataset::{write_dataset, Dataset, MovieRecord};
use crate::{ConfigError, TopReelError};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// One listing page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTask {
    /// Rank offset of the first entry on the page
    pub offset: u32,

    /// Full page URL
    pub url: String,
}

/// Page-phase counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTally {
    /// Pages submitted to the pool
    pub attempted: usize,

    /// Pages whose fetch returned a body
    pub fetched: usize,

    /// Pages that exhausted their retries or whose task died
    pub absent: usize,

    /// Fetched pages the extractor could not process
    pub failed_extractions: usize,

    /// Records collected across all pages
    pub records: usize,

    /// Malformed entries skipped across all pages
    pub skipped_entries: usize,
}

/// Poster-phase outcome, displayed as `succeeded/total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PosterReport {
    pub succeeded: usize,
    pub total: usize,
}

impl std::fmt::Display for PosterReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.total)
    }
}

/// Computes the static set of page requests for the listing
///
/// Offsets are `0, page_size, 2 * page_size, ...` and each URL is the base URL
/// with `start=<offset>` appended to its query. An offset that does not fit
/// in `u32` is a configuration error.
pub fn page_tasks(source: &SourceConfig) -> Result<Vec<PageTask>, TopReelError> {
    let base = Url::parse(&source.base_url)?;

    (0..source.page_count)
        .map(|page| -> Result<PageTask, TopReelError> {
            let offset = page.checked_mul(source.page_size).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "offset of page {} overflows with page_size {}",
                    page, source.page_size
                ))
            })?;
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("start", &offset.to_string());
            Ok(PageTask {
                offset,
                url: url.to_string(),
            })
        })
        .collect()
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    fetcher: Arc<Fetcher>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Output directories are created here so every later write has a home.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TopReelError)` - Directory creation or client setup failed
    pub fn new(config: Config) -> Result<Self, TopReelError> {
        config.output.create_dirs()?;

        let client = build_http_client(&config.request)?;
        let archive = RawArchive::new(&config.output.archive_dir);
        let fetcher = Fetcher::new(client.clone(), config.crawler.clone(), archive);

        Ok(Self {
            config: Arc::new(config),
            client,
            fetcher: Arc::new(fetcher),
        })
    }

    fn pool_width(&self) -> usize {
        self.config.crawler.max_workers.max(1) as usize
    }

    /// Runs the full crawl
    ///
    /// Fetches and extracts every page, overwrites the dataset file, downloads
    /// the posters and returns the in-memory dataset.
    pub async fn run(&self) -> Result<Dataset, TopReelError> {
        tracing::info!(
            "Starting crawl of {} pages from {}",
            self.config.source.page_count,
            self.config.source.base_url
        );

        let (dataset, tally) = self.crawl_pages().await?;
        tracing::info!(
            "Collected {} movies from {}/{} pages ({} absent, {} unparsable, {} entries skipped)",
            tally.records,
            tally.fetched,
            tally.attempted,
            tally.absent,
            tally.failed_extractions,
            tally.skipped_entries
        );

        let dataset_path = Path::new(&self.config.output.dataset_path);
        write_dataset(dataset_path, &dataset)?;
        tracing::info!("Dataset saved to {}", dataset_path.display());

        tracing::info!("Downloading posters...");
        let report = self.download_posters(&dataset).await;
        tracing::info!("Downloaded {} posters", report);

        Ok(dataset)
    }

    /// Phase 1: fetches and extracts every listing page
    ///
    /// Results are consumed in completion order. Records are ordered by page
    /// offset before being returned, so the dataset does not depend on which
    /// page happened to finish first.
    pub async fn crawl_pages(&self) -> Result<(Dataset, PageTally), TopReelError> {
        let tasks = page_tasks(&self.config.source)?;
        let mut tally = PageTally {
            attempted: tasks.len(),
            ..PageTally::default()
        };
        let mut pages: Vec<(u32, Vec<MovieRecord>)> = Vec::with_capacity(tasks.len());

        let mut completions = stream::iter(tasks)
            .map(|task| {
                let fetcher = Arc::clone(&self.fetcher);
                async move {
                    let url = task.url.clone();
                    let joined = tokio::spawn(async move { fetcher.fetch(&url).await }).await;
                    (task, joined)
                }
            })
            .buffer_unordered(self.pool_width());

        while let Some((task, joined)) = completions.next().await {
            let body = match joined {
                Ok(FetchResult::Success { body, attempts, .. }) => {
                    tracing::debug!("Fetched {} after {} attempt(s)", task.url, attempts);
                    tally.fetched += 1;
                    body
                }
                Ok(FetchResult::Exhausted {
                    attempts,
                    last_error,
                    ..
                }) => {
                    tracing::warn!(
                        "No content for {} after {} attempts ({}); page contributes no movies",
                        task.url,
                        attempts,
                        last_error
                    );
                    tally.absent += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!("Fetch task for {} died: {}", task.url, e);
                    tally.absent += 1;
                    continue;
                }
            };

            match parse_listing(&body) {
                Ok(listing) => {
                    tracing::info!(
                        "Parsed page {}: {} movies",
                        task.url,
                        listing.records.len()
                    );
                    tally.records += listing.records.len();
                    tally.skipped_entries += listing.skipped.len();
                    pages.push((task.offset, listing.records));
                }
                Err(message) => {
                    let error = TopReelError::HtmlParse {
                        url: task.url.clone(),
                        message,
                    };
                    tracing::error!("{}", error);
                    tally.failed_extractions += 1;
                }
            }
        }

        pages.sort_by_key(|(offset, _)| *offset);
        let records: Vec<MovieRecord> = pages
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect();

        Ok((Dataset::new(records), tally))
    }

    /// Phase 2: downloads one poster per record
    ///
    /// Downloads are not retried. Each failure is logged and counted as
    /// unsuccessful; it never stops the other downloads.
    pub async fn download_posters(&self, dataset: &Dataset) -> PosterReport {
        let image_dir = Path::new(&self.config.output.image_dir);
        let names = poster_file_names(dataset.records());

        let succeeded = stream::iter(dataset.iter().zip(names))
            .map(|(record, name)| {
                let client = self.client.clone();
                let url = record.poster_url.clone();
                let target = image_dir.join(name);
                async move {
                    let joined = tokio::spawn(async move {
                        match download_poster(&client, &url, &target).await {
                            Ok(bytes) => {
                                tracing::debug!("Saved {} ({} bytes)", target.display(), bytes);
                                true
                            }
                            Err(e) => {
                                tracing::warn!("Failed to download poster {}: {}", url, e);
                                false
                            }
                        }
                    })
                    .await;

                    joined.unwrap_or_else(|e| {
                        tracing::error!("Poster task died: {}", e);
                        false
                    })
                }
            })
            .buffer_unordered(self.pool_width())
            .filter(|saved| futures::future::ready(*saved))
            .count()
            .await;

        PosterReport {
            succeeded,
            total: dataset.len(),
        }
    }
}
