use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use product_image_scraper::{load_records, run, HttpTransport, ScrapeConfig, Site};

#[derive(Parser, Debug)]
#[command(name = "product-image-scraper")]
#[command(about = "Download product images listed in a CSV of (url, name) pairs")]
struct Args {
    /// CSV file with `url` and `name` header columns.
    input: PathBuf,

    /// Root directory for downloaded images.
    #[arg(short, long, default_value = "downloaded_images")]
    out: PathBuf,

    /// Which site's extraction rules to apply.
    #[arg(short, long, value_enum, default_value_t = Site::Fairway)]
    site: Site,

    /// Pause between records, in milliseconds.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Request timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // A record-source failure is the one fatal error: it aborts here,
    // before any network activity.
    let records = load_records(&args.input)
        .with_context(|| format!("failed to load records from {}", args.input.display()))?;
    if records.is_empty() {
        println!("No valid records found in {}", args.input.display());
        return Ok(());
    }
    println!("Found {} records", records.len());
    println!("Images will be saved under {}", args.out.display());

    let transport = HttpTransport::new(Duration::from_secs(args.timeout))
        .context("failed to build HTTP client")?;
    let config = ScrapeConfig {
        output_root: args.out,
        strategy: args.site.strategy(),
        pacing: Duration::from_millis(args.delay_ms),
    };

    let summary = run(&transport, &records, &config).await;

    println!("\nCompleted!");
    println!("Records processed: {}", summary.records_processed);
    println!("Images downloaded: {}", summary.images_downloaded);
    Ok(())
}
