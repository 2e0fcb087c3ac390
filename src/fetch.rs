use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::ScrapeError;

/// Some servers reject unidentified clients, so every request carries a
/// realistic browser identity.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_EXTENSION: &str = ".jpg";

/// Raw response for a candidate asset.
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Transport seam between the pipeline and the network, so the orchestrator
/// can be driven by a stub in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
    async fn fetch_asset(&self, url: &str) -> Result<AssetResponse, ScrapeError>;
}

/// reqwest-backed transport with a request timeout and the static
/// client-identity header.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let page_error = |reason: String| ScrapeError::PageFetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| page_error(e.to_string()))?;
        response.text().await.map_err(|e| page_error(e.to_string()))
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetResponse, ScrapeError> {
        let asset_error = |reason: String| ScrapeError::AssetFetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| asset_error(e.to_string()))?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| asset_error(e.to_string()))?;
        Ok(AssetResponse {
            content_type,
            bytes,
        })
    }
}

/// The result of one candidate download attempt. Produced once, consumed
/// immediately by the orchestrator for persisting and counting.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// A confirmed image, with the extension the file should be saved under.
    Success { bytes: Bytes, extension: String },
    /// The server answered, but not with an image (error page, redirect).
    Skipped { reason: String },
    /// Transport failure or non-success status.
    Failed { reason: String },
}

/// Download one candidate and validate that it really is an image. Never
/// panics or propagates: any failure is folded into the outcome so one bad
/// link cannot take down the rest of the record.
pub async fn fetch_candidate<T: Transport + ?Sized>(
    transport: &T,
    candidate: &str,
) -> DownloadOutcome {
    let response = match transport.fetch_asset(candidate).await {
        Ok(response) => response,
        Err(e) => {
            return DownloadOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let content_type = response.content_type.unwrap_or_default();
    if !content_type.to_lowercase().starts_with("image/") {
        return DownloadOutcome::Skipped {
            reason: ScrapeError::InvalidContent {
                url: candidate.to_string(),
                content_type,
            }
            .to_string(),
        };
    }

    let extension = extension_from_url(candidate)
        .unwrap_or_else(|| extension_for_content_type(&content_type));

    DownloadOutcome::Success {
        bytes: response.bytes,
        extension,
    }
}

/// Extension from the final path segment of the candidate URL, query string
/// excluded. Returns `None` when the segment has no usable extension.
fn extension_from_url(candidate: &str) -> Option<String> {
    let parsed = Url::parse(candidate).ok()?;
    let file = parsed.path().rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{ext}"))
}

/// Map a declared media type to an extension, defaulting to `.jpg` for
/// anything unrecognized.
fn extension_for_content_type(content_type: &str) -> String {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    match media_type.as_str() {
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/bmp" => ".bmp",
        "image/tiff" => ".tiff",
        "image/avif" => ".avif",
        "image/svg+xml" => ".svg",
        "image/x-icon" | "image/vnd.microsoft.icon" => ".ico",
        _ => DEFAULT_EXTENSION,
    }
    .to_string()
}
