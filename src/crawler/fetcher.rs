//! HTTP fetcher implementation
//!
//! This module handles every listing-page request, including:
//! - Building the HTTP client with the fixed header set
//! - Randomized pacing before each attempt
//! - Retry logic for network errors, bad statuses and challenge pages
//! - Archiving exactly one raw document per fetch

use crate::archive::RawArchive;
use crate::config::{CrawlerConfig, RequestConfig};
use chrono::Local;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of a fetch operation
///
/// `Exhausted` is the "absent" outcome: the page contributes no records but
/// the run carries on.
#[derive(Debug)]
pub enum FetchResult {
    /// A non-challenge 2xx body was received
    Success {
        /// The requested URL
        url: String,
        /// Raw page body
        body: String,
        /// Attempts used, including the successful one
        attempts: u32,
        /// Where the raw body was archived
        archive_path: PathBuf,
    },

    /// Every attempt failed
    Exhausted {
        /// The requested URL
        url: String,
        /// Attempts used
        attempts: u32,
        /// Description of the final failure
        last_error: String,
        /// Where the empty failure marker was archived
        archive_path: PathBuf,
    },
}

impl FetchResult {
    pub fn attempts(&self) -> u32 {
        match self {
            FetchResult::Success { attempts, .. } | FetchResult::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn archive_path(&self) -> &Path {
        match self {
            FetchResult::Success { archive_path, .. }
            | FetchResult::Exhausted { archive_path, .. } => archive_path,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            FetchResult::Success { body, .. } => Some(body),
            FetchResult::Exhausted { .. } => None,
        }
    }
}

/// Why a single attempt did not produce a usable body
#[derive(Debug)]
enum AttemptFailure {
    /// Non-2xx response
    Status(u16),
    /// The body was the anti-automation challenge page
    Challenge,
    /// Connection, timeout or body-read error
    Network(String),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Status(code) => write!(f, "HTTP {}", code),
            AttemptFailure::Challenge => write!(f, "anti-automation challenge"),
            AttemptFailure::Network(error) => write!(f, "{}", error),
        }
    }
}

/// Builds an HTTP client with the configured header set and timeout
///
/// # Example
///
/// ```no_run
/// use top_reel::config::RequestConfig;
/// use top_reel::crawler::build_http_client;
///
/// let client = build_http_client(&RequestConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RequestConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, ACCEPT_LANGUAGE, &config.accept_language);
    insert_header(&mut headers, CONNECTION, &config.connection);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if value.is_empty() {
        return;
    }
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!("Ignoring invalid {} header value: {:?}", name, value),
    }
}

/// Fetches listing pages with pacing, retries and archiving
pub struct Fetcher {
    client: Client,
    config: CrawlerConfig,
    archive: RawArchive,
}

impl Fetcher {
    pub fn new(client: Client, config: CrawlerConfig, archive: RawArchive) -> Self {
        Self {
            client,
            config,
            archive,
        }
    }

    /// Fetches a URL with full retry logic
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Any attempt | Random delay in `[delay-min-ms, delay-max-ms]` first |
    /// | Non-2xx status | Retry after `error-backoff-ms` |
    /// | Network error | Retry after `error-backoff-ms` |
    /// | Challenge marker in body | Retry after `challenge-cooldown-ms` |
    /// | Attempts exhausted | Archive empty marker, return `Exhausted` |
    ///
    /// Exactly one archive file is written per call, whatever the outcome.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let archive_path = self.archive.path_for(url, Local::now());
        let max_attempts = self.config.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.request_delay()).await;

            match self.attempt(url).await {
                Ok(body) => {
                    match self.archive.store(&archive_path, &body).await {
                        Ok(()) => tracing::debug!(
                            "Archived {} to {}",
                            url,
                            archive_path.display()
                        ),
                        Err(e) => tracing::error!(
                            "Failed to archive {} to {}: {}",
                            url,
                            archive_path.display(),
                            e
                        ),
                    }

                    return FetchResult::Success {
                        url: url.to_string(),
                        body,
                        attempts: attempt,
                        archive_path,
                    };
                }
                Err(failure) => {
                    tracing::warn!(
                        "Request failed for {} ({}/{}): {}",
                        url,
                        attempt,
                        max_attempts,
                        failure
                    );

                    let pause = match failure {
                        AttemptFailure::Challenge => self.config.challenge_cooldown_ms,
                        AttemptFailure::Status(_) | AttemptFailure::Network(_) => {
                            self.config.error_backoff_ms
                        }
                    };
                    last_error = failure.to_string();

                    if attempt < max_attempts {
                        tokio::time::sleep(Duration::from_millis(pause)).await;
                    }
                }
            }
        }

        tracing::error!("Giving up on {} after {} attempts", url, max_attempts);
        match self.archive.store_failure_marker(&archive_path).await {
            Ok(()) => tracing::info!("Wrote failure marker {}", archive_path.display()),
            Err(e) => tracing::error!(
                "Failed to write failure marker {}: {}",
                archive_path.display(),
                e
            ),
        }

        FetchResult::Exhausted {
            url: url.to_string(),
            attempts: max_attempts,
            last_error,
            archive_path,
        }
    }

    /// Issues a single GET and classifies the response
    async fn attempt(&self, url: &str) -> Result<String, AttemptFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_network_error)?;

        if body.contains(self.config.challenge_marker.as_str()) {
            return Err(AttemptFailure::Challenge);
        }

        Ok(body)
    }

    /// Random pre-request delay drawn uniformly from the configured range
    fn request_delay(&self) -> Duration {
        let min = self.config.delay_min_ms;
        let max = self.config.delay_max_ms.max(min);
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

fn classify_network_error(error: reqwest::Error) -> AttemptFailure {
    if error.is_timeout() {
        AttemptFailure::Network("Request timeout".to_string())
    } else if error.is_connect() {
        AttemptFailure::Network(format!("Connection failed: {}", error))
    } else {
        AttemptFailure::Network(error.to_string())
    }
}
