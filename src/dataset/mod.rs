//! Movie records and the persisted dataset
//!
//! The dataset is written once per crawl as a CSV file prefixed with a UTF-8
//! byte-order mark, so spreadsheet tools detect the encoding of the Chinese
//! titles and regions correctly.

mod csv_file;

pub use csv_file::{read_dataset, write_dataset, DATASET_COLUMNS};

use serde::{Deserialize, Serialize};

/// One ranked movie extracted from a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Primary title, never empty
    pub title: String,

    /// Release year as displayed; not validated until reporting
    #[serde(default)]
    pub year: String,

    /// First listed production region
    #[serde(default)]
    pub region: String,

    /// Poster image URL, possibly malformed
    #[serde(rename = "poster", default)]
    pub poster_url: String,
}

impl MovieRecord {
    pub fn new(
        title: impl Into<String>,
        year: impl Into<String>,
        region: impl Into<String>,
        poster_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            region: region.into(),
            poster_url: poster_url.into(),
        }
    }
}

/// Ordered sequence of movie records produced by one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MovieRecord>,
}

impl Dataset {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MovieRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a MovieRecord;
    type IntoIter = std::slice::Iter<'a, MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
