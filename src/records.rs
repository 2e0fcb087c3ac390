use std::path::Path;

use serde::Deserialize;

use crate::error::ScrapeError;

/// One unit of work: a product page to scrape and the name to file its
/// images under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub source_url: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    url: Option<String>,
    name: Option<String>,
}

/// Load records from a CSV file with `url` and `name` header columns.
///
/// Rows missing either value (or failing to parse at all) are dropped with a
/// warning; only a file-level failure is an error, and the caller treats that
/// as fatal before any network activity happens.
pub fn load_records(path: &Path) -> Result<Vec<Record>, ScrapeError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ScrapeError::RecordSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                log::warn!("skipping unreadable row {}: {}", i + 1, e);
                continue;
            }
        };
        match (row.url, row.name) {
            (Some(url), Some(name)) if !url.trim().is_empty() && !name.trim().is_empty() => {
                records.push(Record {
                    source_url: url.trim().to_string(),
                    display_name: name.trim().to_string(),
                });
            }
            _ => log::debug!("skipping incomplete row {}", i + 1),
        }
    }
    Ok(records)
}
