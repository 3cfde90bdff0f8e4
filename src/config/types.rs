use serde::Deserialize;
use std::path::Path;

/// Main configuration structure for Top-Reel
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the values used against the live Douban listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub request: RequestConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Where the ranked listing lives and how it is paginated
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Listing URL; pages are requested as `<base-url>?start=<offset>`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Entries per page, also the offset stride
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Number of pages making up the full listing
    #[serde(rename = "page-count")]
    pub page_count: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://movie.douban.com/top250".to_string(),
            page_size: 25,
            page_count: 10,
        }
    }
}

/// Fixed header set and timeout sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    pub connection: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
            connection: "keep-alive".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Retry, pacing and pool-width settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Attempts per page before it is given up as absent
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Lower bound of the random pre-request delay (milliseconds)
    #[serde(rename = "delay-min-ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the random pre-request delay (milliseconds)
    #[serde(rename = "delay-max-ms")]
    pub delay_max_ms: u64,

    /// Pause after an anti-automation challenge page (milliseconds)
    #[serde(rename = "challenge-cooldown-ms")]
    pub challenge_cooldown_ms: u64,

    /// Pause after a network error or non-2xx status (milliseconds)
    #[serde(rename = "error-backoff-ms")]
    pub error_backoff_ms: u64,

    /// Body text that identifies the anti-automation challenge page
    #[serde(rename = "challenge-marker")]
    pub challenge_marker: String,

    /// Width of both the page pool and the poster pool
    #[serde(rename = "max-workers")]
    pub max_workers: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_min_ms: 1000,
            delay_max_ms: 3000,
            challenge_cooldown_ms: 5000,
            error_backoff_ms: 2000,
            challenge_marker: "检测到有异常请求".to_string(),
            max_workers: 4,
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV dataset; its presence skips the crawl
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Directory receiving poster images
    #[serde(rename = "image-dir")]
    pub image_dir: String,

    /// Flat directory receiving one raw document per page fetch
    #[serde(rename = "archive-dir")]
    pub archive_dir: String,

    /// Rendered year-distribution chart (SVG)
    #[serde(rename = "chart-path")]
    pub chart_path: String,

    /// Markdown summary report
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/douban_top250_chinese_movies.csv".to_string(),
            image_dir: "film_img".to_string(),
            archive_dir: "html_pages".to_string(),
            chart_path: "results/movie_count_by_year.svg".to_string(),
            summary_path: "results/summary.md".to_string(),
        }
    }
}

impl OutputConfig {
    /// Creates every directory an output path lives in
    pub fn create_dirs(&self) -> std::io::Result<()> {
        let parents = [
            Path::new(&self.dataset_path).parent(),
            Path::new(&self.chart_path).parent(),
            Path::new(&self.summary_path).parent(),
        ];
        let dirs = [Path::new(&self.image_dir), Path::new(&self.archive_dir)];

        for dir in parents.into_iter().flatten().chain(dirs) {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
                tracing::info!("Created directory: {}", dir.display());
            }
        }

        Ok(())
    }
}
