use crate::dataset::{Dataset, MovieRecord};
use crate::TopReelError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte-order mark written ahead of the header row
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of the dataset file
pub const DATASET_COLUMNS: [&str; 4] = ["title", "year", "region", "poster"];

/// Writes the dataset to `path`, replacing any previous file
///
/// The file starts with a UTF-8 BOM, then a `title,year,region,poster` header
/// and one row per record. There is no index column.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), TopReelError> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    // Written explicitly so an empty dataset still gets its header row
    writer.write_record(DATASET_COLUMNS)?;
    for record in dataset {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Reads a dataset previously written by [`write_dataset`]
///
/// A leading BOM is accepted but not required.
pub fn read_dataset(path: &Path) -> Result<Dataset, TopReelError> {
    let bytes = std::fs::read(path)?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let records = reader
        .deserialize::<MovieRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(records))
}
