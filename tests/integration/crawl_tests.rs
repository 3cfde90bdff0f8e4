//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the listing site and the poster
//! host, and run the crawl and the full pipeline end-to-end.

use std::path::Path;
use tempfile::TempDir;
use top_reel::config::{Config, CrawlerConfig, OutputConfig, RequestConfig, SourceConfig};
use top_reel::crawler::Coordinator;
use top_reel::dataset::read_dataset;
use top_reel::{run_pipeline, DatasetSource};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_SIZE: u32 = 25;
const PAGE_COUNT: u32 = 10;
const ENTRIES_PER_PAGE: usize = 2;

/// Creates a test configuration pointing at the mock server, with every pause
/// set to zero and all outputs inside `dir`
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    let out = |name: &str| dir.join(name).to_string_lossy().into_owned();

    Config {
        source: SourceConfig {
            base_url: format!("{}/top250", base_url),
            page_size: PAGE_SIZE,
            page_count: PAGE_COUNT,
        },
        request: RequestConfig {
            timeout_secs: 5,
            ..RequestConfig::default()
        },
        crawler: CrawlerConfig {
            max_retries: 1,
            delay_min_ms: 0,
            delay_max_ms: 0,
            challenge_cooldown_ms: 0,
            error_backoff_ms: 0,
            max_workers: 4,
            ..CrawlerConfig::default()
        },
        output: OutputConfig {
            dataset_path: out("data/movies.csv"),
            image_dir: out("film_img"),
            archive_dir: out("html_pages"),
            chart_path: out("results/chart.svg"),
            summary_path: out("results/summary.md"),
        },
    }
}

/// One ranked entry in the listing markup
fn entry_html(title: &str, year: u32, region: &str, poster: &str) -> String {
    format!(
        r##"<li><div class="item">
            <div class="pic"><a href="#"><img alt="{title}" src="{poster}"></a></div>
            <div class="info">
                <div class="hd"><a href="#"><span class="title">{title}</span><span class="other">&nbsp;/&nbsp;Alias</span></a></div>
                <div class="bd"><p class="">导演: Someone&nbsp;&nbsp;&nbsp;主演: Someone Else<br>
                    {year}&nbsp;/&nbsp;{region}&nbsp;/&nbsp;剧情
                </p></div>
            </div>
        </div></li>"##
    )
}

/// Listing page for `page` with entries whose posters live on `base_url`
fn listing_html(base_url: &str, page: u32) -> String {
    let entries: String = (0..ENTRIES_PER_PAGE)
        .map(|i| {
            let rank = page * PAGE_SIZE + i as u32;
            entry_html(
                &format!("Movie {}", rank),
                1990 + page,
                "美国",
                &format!("{}/posters/{}.jpg", base_url, rank),
            )
        })
        .collect();

    format!(
        r#"<html><body><div id="content"><ol class="grid_view">{}</ol></div></body></html>"#,
        entries
    )
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/top250"))
        .and(query_param("start", (page * PAGE_SIZE).to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer) {
    for page in 0..PAGE_COUNT {
        let body = listing_html(&server.uri(), page);
        mount_page(server, page, ResponseTemplate::new(200).set_body_string(body)).await;
    }
}

async fn mount_posters(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/posters/\d+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFFu8, 0xD8, 0xFF, 0xE0]))
        .mount(server)
        .await;
}

fn file_sizes(dir: &str) -> Vec<u64> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().metadata().unwrap().len())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_collects_every_page() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_posters(&server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), temp.path());
    let output = config.output.clone();

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let dataset = coordinator.run().await.expect("Crawl failed");

    assert_eq!(dataset.len(), PAGE_COUNT as usize * ENTRIES_PER_PAGE);

    // Records follow page offset, then display order within the page
    let titles: Vec<&str> = dataset.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles[0], "Movie 0");
    assert_eq!(titles[1], "Movie 1");
    assert_eq!(titles[2], "Movie 25");
    assert_eq!(titles[19], "Movie 226");

    let first = &dataset.records()[0];
    assert_eq!(first.year, "1990");
    assert_eq!(first.region, "美国");
    assert_eq!(first.poster_url, format!("{}/posters/0.jpg", server.uri()));

    // The persisted dataset matches what the crawl returned
    let persisted = read_dataset(Path::new(&output.dataset_path)).unwrap();
    assert_eq!(persisted, dataset);

    // One archived response per page
    let archived = file_sizes(&output.archive_dir);
    assert_eq!(archived.len(), PAGE_COUNT as usize);
    assert!(archived.iter().all(|&size| size > 0));

    // One poster per record
    let posters = file_sizes(&output.image_dir);
    assert_eq!(posters.len(), dataset.len());
    assert!(Path::new(&output.image_dir).join("Movie 0.jpg").exists());
}

#[tokio::test]
async fn test_failed_pages_contribute_no_records() {
    let server = MockServer::start().await;
    let failing = [1u32, 4, 8];

    for page in 0..PAGE_COUNT {
        let response = if failing.contains(&page) {
            ResponseTemplate::new(500)
        } else {
            ResponseTemplate::new(200).set_body_string(listing_html(&server.uri(), page))
        };
        mount_page(&server, page, response).await;
    }
    mount_posters(&server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), temp.path());
    let output = config.output.clone();

    let coordinator = Coordinator::new(config).unwrap();
    let (dataset, tally) = coordinator.crawl_pages().await.expect("Crawl failed");

    assert_eq!(tally.attempted, 10);
    assert_eq!(tally.fetched, 7);
    assert_eq!(tally.absent, 3);
    assert_eq!(tally.records, 7 * ENTRIES_PER_PAGE);
    assert_eq!(dataset.len(), 7 * ENTRIES_PER_PAGE);
    assert!(dataset.iter().all(|r| r.title != "Movie 25"));

    // Every attempted page leaves an archive entry; failed ones are empty
    let archived = file_sizes(&output.archive_dir);
    assert_eq!(archived.len(), PAGE_COUNT as usize);
    assert_eq!(archived.iter().filter(|&&size| size == 0).count(), failing.len());
}

#[tokio::test]
async fn test_poster_count_matches_files_on_disk() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    // Two posters are missing, one comes back empty
    Mock::given(method("GET"))
        .and(path_regex(r"^/posters/(0|51)\.jpg$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posters/100.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    mount_posters(&server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), temp.path());
    let image_dir = config.output.image_dir.clone();

    let coordinator = Coordinator::new(config).unwrap();
    let (dataset, _) = coordinator.crawl_pages().await.unwrap();
    let report = coordinator.download_posters(&dataset).await;

    assert_eq!(report.total, 20);
    assert_eq!(report.succeeded, 17);

    let saved = file_sizes(&image_dir);
    assert_eq!(saved.iter().filter(|&&size| size > 0).count(), report.succeeded);
    assert!(!Path::new(&image_dir).join("Movie 100.jpg").exists());
}

#[tokio::test]
async fn test_empty_pages_produce_empty_dataset() {
    let server = MockServer::start().await;
    for page in 0..PAGE_COUNT {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_string("<html><body></body></html>"),
        )
        .await;
    }

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), temp.path());
    let output = config.output.clone();

    let summary = run_pipeline(config).await.expect("Pipeline failed");

    assert_eq!(summary.source, DatasetSource::Crawled);
    assert!(summary.dataset.is_empty());
    assert_eq!(summary.stats.total_movies, 0);

    // Header-only dataset, no chart, summary still written
    let dataset_text = std::fs::read_to_string(&output.dataset_path).unwrap();
    assert_eq!(dataset_text.trim_start_matches('\u{feff}').trim(), "title,year,region,poster");
    assert!(!Path::new(&output.chart_path).exists());
    assert!(Path::new(&output.summary_path).exists());
}

#[tokio::test]
async fn test_second_run_reuses_dataset() {
    let server = MockServer::start().await;

    // Each listing page and poster must be requested exactly once across both runs
    for page in 0..PAGE_COUNT {
        Mock::given(method("GET"))
            .and(path("/top250"))
            .and(query_param("start", (page * PAGE_SIZE).to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing_html(&server.uri(), page)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path_regex(r"^/posters/\d+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .expect(20)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), temp.path());

    let first = run_pipeline(config.clone()).await.expect("First run failed");
    let second = run_pipeline(config).await.expect("Second run failed");

    assert_eq!(first.source, DatasetSource::Crawled);
    assert_eq!(second.source, DatasetSource::Loaded);
    assert_eq!(first.dataset, second.dataset);
    assert_eq!(first.stats, second.stats);

    assert_eq!(first.stats.total_movies, 20);
    assert_eq!(first.stats.earliest_year, Some(1990));
    assert_eq!(first.stats.latest_year, Some(1999));
    assert_eq!(first.stats.peak_count, 2);
    assert_eq!(first.stats.peak_year, Some(1990));
}
