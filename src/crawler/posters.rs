//! Poster downloads
//!
//! One file per record, named after the sanitized title. Downloads are not
//! retried; a failure only costs that one poster.

use crate::dataset::MovieRecord;
use crate::TopReelError;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Extension given to every poster file; content is not checked
pub const POSTER_EXTENSION: &str = "jpg";

/// Characters that are not allowed in filenames on common filesystems
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strips filesystem-illegal characters from a title
///
/// A title made only of illegal characters becomes `untitled`.
pub fn safe_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Poster filenames for a record sequence, one per record in the same order
///
/// Repeated names get the lowest free ` (2)`, ` (3)`, ... suffix so two
/// records never write to the same file, even when a title already looks
/// like a suffixed one.
pub fn poster_file_names(records: &[MovieRecord]) -> Vec<String> {
    let mut issued: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, u32> = HashMap::new();

    records
        .iter()
        .map(|record| {
            let stem = safe_filename(&record.title);
            let mut name = format!("{}.{}", stem, POSTER_EXTENSION);

            if issued.contains(&name) {
                let suffix = next_suffix.entry(stem.clone()).or_insert(2);
                loop {
                    name = format!("{} ({}).{}", stem, suffix, POSTER_EXTENSION);
                    *suffix += 1;
                    if !issued.contains(&name) {
                        break;
                    }
                }
            }

            issued.insert(name.clone());
            name
        })
        .collect()
}

/// Downloads one poster to `path`, streaming the body chunk by chunk
///
/// # Returns
///
/// * `Ok(u64)` - Number of bytes written
/// * `Err(TopReelError)` - Empty URL, request failure, non-2xx status, empty
///   body or write failure; any partial file is removed
pub async fn download_poster(client: &Client, url: &str, path: &Path) -> Result<u64, TopReelError> {
    if url.trim().is_empty() {
        return Err(TopReelError::MissingUrl {
            what: path.display().to_string(),
        });
    }

    let response = client.get(url).send().await.map_err(|source| TopReelError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TopReelError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let result = write_body(response, url, path).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}

async fn write_body(
    mut response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, TopReelError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(|source| TopReelError::Http {
        url: url.to_string(),
        source,
    })? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    if written == 0 {
        return Err(TopReelError::EmptyBody {
            url: url.to_string(),
        });
    }

    Ok(written)
}
