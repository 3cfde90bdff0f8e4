//! Listing extractor
//!
//! This module turns one listing page into movie records:
//! - Ranked-entry containers are selected in document order (display rank)
//! - Title and poster URL come from fixed structural nodes
//! - Year and region are recovered from the free-text description block
//!
//! An entry missing its title or poster node is skipped on its own and
//! reported, instead of failing the whole page.

use crate::dataset::MovieRecord;
use scraper::{ElementRef, Html, Node, Selector};

const ENTRY_SELECTOR: &str = "ol.grid_view li .item";
const TITLE_SELECTOR: &str = ".hd .title:first-child";
const POSTER_SELECTOR: &str = ".pic img";
const DESCRIPTION_SELECTOR: &str = ".bd p";

/// Records extracted from one listing page
#[derive(Debug, Clone, Default)]
pub struct ParsedListing {
    /// Well-formed entries, in display order
    pub records: Vec<MovieRecord>,

    /// Entries that lacked a required node
    pub skipped: Vec<SkippedEntry>,
}

/// A ranked entry that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// 0-based position of the entry on its page
    pub position: usize,

    /// Which required node was missing
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingTitle,
    MissingPoster,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingTitle => write!(f, "missing title node"),
            SkipReason::MissingPoster => write!(f, "missing poster image"),
        }
    }
}

struct ListingSelectors {
    entry: Selector,
    title: Selector,
    poster: Selector,
    description: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self, String> {
        let parse = |css: &str| Selector::parse(css).map_err(|e| format!("{}: {:?}", css, e));
        Ok(Self {
            entry: parse(ENTRY_SELECTOR)?,
            title: parse(TITLE_SELECTOR)?,
            poster: parse(POSTER_SELECTOR)?,
            description: parse(DESCRIPTION_SELECTOR)?,
        })
    }
}

/// Parses a listing page and extracts one record per ranked entry
///
/// # Arguments
///
/// * `html` - The raw listing document
///
/// # Returns
///
/// * `Ok(ParsedListing)` - Records in document order plus skipped entries;
///   a document without entries yields an empty listing
/// * `Err(String)` - The built-in selectors could not be compiled
///
/// # Example
///
/// ```no_run
/// use top_reel::crawler::parse_listing;
///
/// let html = r#"<ol class="grid_view"><li><div class="item">
///     <div class="pic"><img src="https://img.example.com/1.jpg"></div>
///     <div class="hd"><a><span class="title">活着</span></a></div>
///     <div class="bd"><p>导演: 张艺谋<br>1994 / 中国大陆 / 剧情</p></div>
/// </div></li></ol>"#;
/// let listing = parse_listing(html).unwrap();
/// assert_eq!(listing.records[0].year, "1994");
/// ```
pub fn parse_listing(html: &str) -> Result<ParsedListing, String> {
    let selectors = ListingSelectors::new()?;
    let document = Html::parse_document(html);
    let mut listing = ParsedListing::default();

    for (position, entry) in document.select(&selectors.entry).enumerate() {
        match extract_entry(entry, &selectors) {
            Ok(record) => listing.records.push(record),
            Err(reason) => {
                tracing::warn!("Skipping entry {} on page: {}", position, reason);
                listing.skipped.push(SkippedEntry { position, reason });
            }
        }
    }

    Ok(listing)
}

/// Convenience function returning only the records of a listing page
pub fn extract_movies(html: &str) -> Vec<MovieRecord> {
    parse_listing(html)
        .map(|listing| listing.records)
        .unwrap_or_default()
}

fn extract_entry(
    entry: ElementRef<'_>,
    selectors: &ListingSelectors,
) -> Result<MovieRecord, SkipReason> {
    let title = entry
        .select(&selectors.title)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .ok_or(SkipReason::MissingTitle)?;

    let poster_url = entry
        .select(&selectors.poster)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or(SkipReason::MissingPoster)?
        .to_string();

    let (year, region) = entry
        .select(&selectors.description)
        .next()
        .and_then(text_after_first_break)
        .map(|info| split_year_region(&info))
        .unwrap_or_default();

    Ok(MovieRecord {
        title,
        year,
        region,
        poster_url,
    })
}

/// Returns the first text node that follows the first `<br>` in `block`
///
/// Only direct children are scanned. The text is trimmed but may be empty;
/// later text nodes are never consulted.
fn text_after_first_break(block: ElementRef<'_>) -> Option<String> {
    let mut seen_break = false;

    for child in block.children() {
        match child.value() {
            Node::Element(element) if element.name() == "br" => seen_break = true,
            Node::Text(text) if seen_break => return Some(text.trim().to_string()),
            _ => {}
        }
    }

    None
}

/// Splits the metadata line `"<year> / <region> / <genres>"`
///
/// Parts beyond the second are ignored. Fewer than two parts yields empty
/// year and region.
pub fn split_year_region(raw: &str) -> (String, String) {
    let mut parts = raw.split('/');
    match (parts.next(), parts.next()) {
        (Some(year), Some(region)) => (year.trim().to_string(), region.trim().to_string()),
        _ => (String::new(), String::new()),
    }
}
