use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use scraper::Selector;
use url::Url;

use product_image_scraper::{
    run, AssetResponse, AttributeScanConfig, ExtractionStrategy, Record, ResultListConfig,
    ScrapeConfig, ScrapeError, Transport,
};

#[derive(Default)]
struct StubTransport {
    pages: HashMap<String, String>,
    assets: HashMap<String, AssetResponse>,
}

impl StubTransport {
    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn asset(mut self, url: &str, content_type: &str, body: &[u8]) -> Self {
        self.assets.insert(
            url.to_string(),
            AssetResponse {
                content_type: Some(content_type.to_string()),
                bytes: Bytes::copy_from_slice(body),
            },
        );
        self
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::PageFetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetResponse, ScrapeError> {
        self.assets
            .get(url)
            .map(|a| AssetResponse {
                content_type: a.content_type.clone(),
                bytes: a.bytes.clone(),
            })
            .ok_or_else(|| ScrapeError::AssetFetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}

fn attribute_strategy() -> ExtractionStrategy {
    ExtractionStrategy::AttributeScan(AttributeScanConfig {
        site_root: Url::parse("https://site").unwrap(),
        asset_marker: "resources/upload/products/".to_string(),
        thumbnail_markers: vec!["thumbnail".to_string(), "thumb".to_string()],
    })
}

fn config(root: &std::path::Path, strategy: ExtractionStrategy) -> ScrapeConfig {
    ScrapeConfig {
        output_root: root.to_path_buf(),
        strategy,
        pacing: Duration::ZERO,
    }
}

fn record(url: &str, name: &str) -> Record {
    Record {
        source_url: url.to_string(),
        display_name: name.to_string(),
    }
}

const PRODUCT_PAGE: &str = r#"
    <html><body>
        <img src="/resources/upload/products/1/front.jpg">
        <img src="/resources/upload/products/1/back.jpg">
        <img src="/resources/upload/products/1/front_thumbnail.jpg">
    </body></html>
"#;

fn product_transport() -> StubTransport {
    StubTransport::default()
        .page("https://site/p/1", PRODUCT_PAGE)
        .asset(
            "https://site/resources/upload/products/1/front.jpg",
            "image/jpeg",
            b"front-bytes",
        )
        .asset(
            "https://site/resources/upload/products/1/back.jpg",
            "image/jpeg",
            b"back-bytes",
        )
}

#[tokio::test]
async fn downloads_both_non_thumbnail_images_with_indexed_names() {
    let out = tempfile::tempdir().unwrap();
    let transport = product_transport();
    let records = vec![record("https://site/p/1", "Driver X")];

    let summary = run(&transport, &records, &config(out.path(), attribute_strategy())).await;

    assert_eq!(summary.records_processed, 1);
    assert_eq!(summary.images_downloaded, 2);
    let dir = out.path().join("Driver X");
    assert!(dir.is_dir());
    assert_eq!(
        std::fs::read(dir.join("Driver X - 1.jpg")).unwrap(),
        b"front-bytes"
    );
    assert_eq!(
        std::fs::read(dir.join("Driver X - 2.jpg")).unwrap(),
        b"back-bytes"
    );
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
}

#[tokio::test]
async fn page_fetch_failure_does_not_stop_later_records() {
    let out = tempfile::tempdir().unwrap();
    let transport = product_transport(); // knows nothing about /p/404
    let records = vec![
        record("https://site/p/404", "Ghost Item"),
        record("https://site/p/1", "Driver X"),
    ];

    let summary = run(&transport, &records, &config(out.path(), attribute_strategy())).await;

    assert_eq!(summary.records_processed, 2);
    assert_eq!(summary.images_downloaded, 2);
    assert!(out.path().join("Driver X").join("Driver X - 1.jpg").is_file());
}

#[tokio::test]
async fn failed_and_skipped_candidates_are_isolated_within_a_record() {
    let out = tempfile::tempdir().unwrap();
    let page = r#"
        <img src="/resources/upload/products/1/a.jpg">
        <img src="/resources/upload/products/1/b.jpg">
        <img src="/resources/upload/products/1/c.jpg">
    "#;
    // a: transport failure (unregistered), b: html masquerading as an image,
    // c: a real image.
    let transport = StubTransport::default()
        .page("https://site/p/1", page)
        .asset(
            "https://site/resources/upload/products/1/b.jpg",
            "text/html",
            b"<html>not found</html>",
        )
        .asset(
            "https://site/resources/upload/products/1/c.jpg",
            "image/jpeg",
            b"real",
        );
    let records = vec![record("https://site/p/1", "Driver X")];

    let summary = run(&transport, &records, &config(out.path(), attribute_strategy())).await;

    assert_eq!(summary.images_downloaded, 1);
    let dir = out.path().join("Driver X");
    // The index follows extraction order, so the surviving third candidate
    // keeps its slot.
    assert!(dir.join("Driver X - 3.jpg").is_file());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
}

#[tokio::test]
async fn rerunning_the_same_input_overwrites_instead_of_appending() {
    let out = tempfile::tempdir().unwrap();
    let transport = product_transport();
    let records = vec![record("https://site/p/1", "Driver X")];
    let cfg = config(out.path(), attribute_strategy());

    let first = run(&transport, &records, &cfg).await;
    let second = run(&transport, &records, &cfg).await;

    assert_eq!(first, second);
    let dir = out.path().join("Driver X");
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
}

#[tokio::test]
async fn forbidden_characters_are_stripped_from_directory_and_file_names() {
    let out = tempfile::tempdir().unwrap();
    let transport = product_transport();
    let records = vec![record("https://site/p/1", r#"Driver: X "Tour"?"#)];

    let summary = run(&transport, &records, &config(out.path(), attribute_strategy())).await;

    assert_eq!(summary.images_downloaded, 2);
    let dir = out.path().join("Driver X Tour");
    assert!(dir.join("Driver X Tour - 1.jpg").is_file());
}

#[tokio::test]
async fn name_of_only_forbidden_characters_falls_back_to_placeholder_directory() {
    let out = tempfile::tempdir().unwrap();
    let transport = product_transport();
    let records = vec![record("https://site/p/1", r#"\/*?:"<>|"#)];

    let summary = run(&transport, &records, &config(out.path(), attribute_strategy())).await;

    assert_eq!(summary.images_downloaded, 2);
    let dir = out.path().join("item");
    assert!(dir.is_dir());
    // The filenames keep the (sanitized-to-nothing) display name, so only
    // the index and extension remain.
    assert!(dir.join(" - 1.jpg").is_file());
    assert!(dir.join(" - 2.jpg").is_file());
}

#[tokio::test]
async fn zero_candidates_is_not_an_error() {
    let out = tempfile::tempdir().unwrap();
    let transport = StubTransport::default().page("https://site/p/1", "<html><body></body></html>");
    let records = vec![record("https://site/p/1", "Driver X")];

    let summary = run(&transport, &records, &config(out.path(), attribute_strategy())).await;

    assert_eq!(summary.records_processed, 1);
    assert_eq!(summary.images_downloaded, 0);
}

#[tokio::test]
async fn result_list_run_skips_sponsored_containers_end_to_end() {
    let out = tempfile::tempdir().unwrap();
    let page = r#"
        <div data-component-type="s-search-result">
            <span>Sponsored</span>
            <img class="s-image" src="https://cdn/ad.jpg">
        </div>
        <div data-component-type="s-search-result">
            <img class="s-image" src="https://cdn/organic.jpg">
        </div>
    "#;
    let transport = StubTransport::default()
        .page("https://site/s?k=driver", page)
        .asset("https://cdn/ad.jpg", "image/jpeg", b"ad")
        .asset("https://cdn/organic.jpg", "image/jpeg", b"organic");
    let strategy = ExtractionStrategy::ResultList(ResultListConfig {
        container: Selector::parse(r#"div[data-component-type="s-search-result"]"#).unwrap(),
        image: Selector::parse("img.s-image").unwrap(),
        sponsored_marker: "Sponsored".to_string(),
    });
    let records = vec![record("https://site/s?k=driver", "driver search")];

    let summary = run(&transport, &records, &config(out.path(), strategy)).await;

    assert_eq!(summary.images_downloaded, 1);
    let dir = out.path().join("driver search");
    assert_eq!(
        std::fs::read(dir.join("driver search - 1.jpg")).unwrap(),
        b"organic"
    );
}
