use std::path::PathBuf;
use std::time::Duration;

use scraper::Html;
use tokio::fs;
use tokio::time::sleep;

use crate::error::ScrapeError;
use crate::extract::ExtractionStrategy;
use crate::fetch::{fetch_candidate, DownloadOutcome, Transport};
use crate::records::Record;
use crate::sanitize::sanitize;

/// Directory name used when a display name sanitizes to nothing.
const PLACEHOLDER_NAME: &str = "item";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub output_root: PathBuf,
    pub strategy: ExtractionStrategy,
    /// Minimum wait between consecutive records, to bound request rate.
    pub pacing: Duration,
}

/// Totals for one run, accumulated monotonically and reported once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub records_processed: usize,
    pub images_downloaded: usize,
}

/// Process every record sequentially: fetch its page, extract candidates,
/// download and persist each one. Per-record and per-candidate failures are
/// logged and isolated; by the time the record source has been read, nothing
/// can abort the run.
pub async fn run<T: Transport + ?Sized>(
    transport: &T,
    records: &[Record],
    config: &ScrapeConfig,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            sleep(config.pacing).await;
        }
        log::info!(
            "processing {}/{}: {}",
            idx + 1,
            records.len(),
            record.display_name
        );
        let downloaded = process_record(transport, record, config).await;
        log::info!("downloaded {} images for {}", downloaded, record.display_name);
        summary.records_processed += 1;
        summary.images_downloaded += downloaded;
    }
    summary
}

/// One record, start to finish. Returns the number of images persisted;
/// every failure path inside lands on 0 or a partial count, never an error.
async fn process_record<T: Transport + ?Sized>(
    transport: &T,
    record: &Record,
    config: &ScrapeConfig,
) -> usize {
    let safe_name = match sanitize(&record.display_name) {
        name if name.is_empty() => PLACEHOLDER_NAME.to_string(),
        name => name,
    };
    let record_dir = config.output_root.join(&safe_name);
    if let Err(e) = fs::create_dir_all(&record_dir).await {
        log::warn!(
            "{}",
            ScrapeError::Filesystem {
                path: record_dir,
                source: e
            }
        );
        return 0;
    }

    let html = match transport.fetch_page(&record.source_url).await {
        Ok(html) => html,
        Err(e) => {
            log::warn!("{e}");
            return 0;
        }
    };

    // Html is not Send, so the document stays inside this block and only the
    // extracted URLs cross the next await.
    let candidates = {
        let document = Html::parse_document(&html);
        config.strategy.extract(&document)
    };
    if candidates.is_empty() {
        log::warn!("no product images found for {}", record.display_name);
        return 0;
    }

    let mut downloaded = 0;
    for (i, candidate) in candidates.iter().enumerate() {
        log::info!("downloading {candidate}");
        match fetch_candidate(transport, candidate).await {
            DownloadOutcome::Success { bytes, extension } => {
                let filename =
                    sanitize(&format!("{} - {}{}", record.display_name, i + 1, extension));
                let path = record_dir.join(&filename);
                match fs::write(&path, &bytes).await {
                    Ok(()) => {
                        downloaded += 1;
                        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
                    }
                    Err(e) => log::warn!("{}", ScrapeError::Filesystem { path, source: e }),
                }
            }
            DownloadOutcome::Skipped { reason } => log::warn!("skipped {candidate}: {reason}"),
            DownloadOutcome::Failed { reason } => {
                log::warn!("failed to download {candidate}: {reason}")
            }
        }
    }
    downloaded
}
