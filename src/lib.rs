pub mod error;
pub mod extract;
pub mod fetch;
pub mod orchestrator;
pub mod records;
pub mod sanitize;
pub mod site;

pub use error::ScrapeError;
pub use extract::{
    AttributeScanConfig, ExtractionStrategy, GalleryScopedConfig, ResultListConfig,
};
pub use fetch::{fetch_candidate, AssetResponse, DownloadOutcome, HttpTransport, Transport};
pub use orchestrator::{run, RunSummary, ScrapeConfig};
pub use records::{load_records, Record};
pub use sanitize::sanitize;
pub use site::Site;
