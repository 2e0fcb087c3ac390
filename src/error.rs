use std::path::PathBuf;

use thiserror::Error;

/// Classified failures, from fatal (record source) down to per-candidate.
///
/// Only `RecordSource` is allowed to end a run; everything else is caught at
/// its own scope by the orchestrator and logged.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to read record source {path}: {reason}")]
    RecordSource { path: String, reason: String },

    #[error("page fetch failed for {url}: {reason}")]
    PageFetch { url: String, reason: String },

    #[error("asset fetch failed for {url}: {reason}")]
    AssetFetch { url: String, reason: String },

    #[error("{url} returned non-image content type {content_type:?}")]
    InvalidContent { url: String, content_type: String },

    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
