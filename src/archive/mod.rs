//! Raw-response archive
//!
//! Every page fetch leaves exactly one file behind in a flat directory, named
//! `<timestamp>_<hash>.html`. The file holds the raw body on success and is
//! empty when all attempts were exhausted, so each fetch can be inspected
//! after the fact.

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Number of hex characters of the URL hash kept in archive filenames
const HASH_PREFIX_LEN: usize = 8;

/// Timestamp layout used in archive filenames
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes raw documents to a flat archive directory
#[derive(Debug, Clone)]
pub struct RawArchive {
    dir: PathBuf,
}

impl RawArchive {
    /// Creates an archive rooted at `dir`
    ///
    /// The directory is not created here; callers bootstrap it together with
    /// the other output directories.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Computes the archive path for a fetch of `url` started at `started_at`
    pub fn path_for(&self, url: &str, started_at: DateTime<Local>) -> PathBuf {
        self.dir.join(archive_file_name(url, started_at))
    }

    /// Stores the raw body of a successful fetch
    pub async fn store(&self, path: &Path, body: &str) -> std::io::Result<()> {
        tokio::fs::write(path, body.as_bytes()).await
    }

    /// Stores the empty marker left by a fetch that exhausted its attempts
    pub async fn store_failure_marker(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, b"").await
    }
}

/// Builds `<timestamp>_<8-hex-hash>.html` for a URL
///
/// The timestamp has one-second resolution, so two fetches of the same URL
/// started within the same second share a name and the later one replaces
/// the earlier file. A crawl requests each page URL once, which keeps one
/// file per fetch.
pub fn archive_file_name(url: &str, started_at: DateTime<Local>) -> String {
    format!(
        "{}_{}.html",
        started_at.format(TIMESTAMP_FORMAT),
        url_hash(url)
    )
}

/// First eight hex characters of the SHA-256 of the URL
pub fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(HASH_PREFIX_LEN);
    encoded
}
