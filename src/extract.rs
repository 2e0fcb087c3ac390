use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Order-preserving set of candidate URLs. Iteration order is first-seen
/// document order, which keeps extraction deterministic and testable.
#[derive(Debug, Default)]
struct UrlSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl UrlSet {
    fn insert(&mut self, url: String) {
        if self.seen.insert(url.clone()) {
            self.ordered.push(url);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Whole-document scan of `img[src|data-src]` and `a[href]`, filtered by an
/// asset-path marker and thumbnail exclusion markers.
#[derive(Debug, Clone)]
pub struct AttributeScanConfig {
    pub site_root: Url,
    pub asset_marker: String,
    pub thumbnail_markers: Vec<String>,
}

/// Scan restricted to a single gallery container; no container, no
/// candidates. Deliberately does not fall back to a whole-document scan,
/// which would pick up unrelated page chrome.
#[derive(Debug, Clone)]
pub struct GalleryScopedConfig {
    pub site_root: Url,
    pub container: Selector,
    pub asset_marker: String,
    pub thumbnail_markers: Vec<String>,
}

/// Search-results scan: one candidate per result container, skipping any
/// container whose text carries the sponsorship marker.
#[derive(Debug, Clone)]
pub struct ResultListConfig {
    pub container: Selector,
    pub image: Selector,
    pub sponsored_marker: String,
}

/// A site-specific extraction rule. The set is closed: the orchestrator
/// picks a variant by configuration, never by inspecting the page.
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    AttributeScan(AttributeScanConfig),
    GalleryScoped(GalleryScopedConfig),
    ResultList(ResultListConfig),
}

impl ExtractionStrategy {
    /// Extract deduplicated absolute candidate URLs from a parsed page, in
    /// first-seen order. An unrecognizable page yields an empty list, never
    /// an error.
    pub fn extract(&self, document: &Html) -> Vec<String> {
        match self {
            ExtractionStrategy::AttributeScan(cfg) => attribute_scan(document, cfg),
            ExtractionStrategy::GalleryScoped(cfg) => gallery_scoped(document, cfg),
            ExtractionStrategy::ResultList(cfg) => result_list(document, cfg),
        }
    }
}

/// Keep an attribute value only if it points into the site's upload
/// directory and is not a thumbnail variant.
fn qualifies(value: &str, asset_marker: &str, thumbnail_markers: &[String]) -> bool {
    if !value.contains(asset_marker) {
        return false;
    }
    let lowered = value.to_lowercase();
    !thumbnail_markers.iter().any(|m| lowered.contains(m.as_str()))
}

/// Resolve a possibly-relative attribute value against the site root. The
/// leading slash is stripped before joining to avoid double separators.
fn absolutize(site_root: &Url, value: &str) -> Option<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    site_root
        .join(value.trim_start_matches('/'))
        .ok()
        .map(|u| u.to_string())
}

fn attribute_scan(document: &Html, cfg: &AttributeScanConfig) -> Vec<String> {
    let img_selector = Selector::parse("img").unwrap();
    let a_selector = Selector::parse("a").unwrap();

    let mut candidates = UrlSet::default();
    for img in document.select(&img_selector) {
        for attr in ["src", "data-src"] {
            if let Some(value) = img.value().attr(attr) {
                if qualifies(value, &cfg.asset_marker, &cfg.thumbnail_markers) {
                    if let Some(url) = absolutize(&cfg.site_root, value) {
                        candidates.insert(url);
                    }
                }
            }
        }
    }
    for a in document.select(&a_selector) {
        if let Some(value) = a.value().attr("href") {
            if qualifies(value, &cfg.asset_marker, &cfg.thumbnail_markers) {
                if let Some(url) = absolutize(&cfg.site_root, value) {
                    candidates.insert(url);
                }
            }
        }
    }
    candidates.into_vec()
}

fn gallery_scoped(document: &Html, cfg: &GalleryScopedConfig) -> Vec<String> {
    let Some(gallery) = document.select(&cfg.container).next() else {
        return Vec::new();
    };
    let img_selector = Selector::parse("img").unwrap();

    let mut candidates = UrlSet::default();
    for img in gallery.select(&img_selector) {
        // src wins over data-src; an empty src falls through to data-src.
        let value = img
            .value()
            .attr("src")
            .filter(|v| !v.is_empty())
            .or_else(|| img.value().attr("data-src"));
        if let Some(value) = value {
            if qualifies(value, &cfg.asset_marker, &cfg.thumbnail_markers) {
                if let Some(url) = absolutize(&cfg.site_root, value) {
                    candidates.insert(url);
                }
            }
        }
    }
    candidates.into_vec()
}

fn contains_sponsored_text(container: ElementRef<'_>, marker: &str) -> bool {
    container.text().any(|t| t.contains(marker))
}

fn result_list(document: &Html, cfg: &ResultListConfig) -> Vec<String> {
    let mut candidates = UrlSet::default();
    for container in document.select(&cfg.container) {
        if contains_sponsored_text(container, &cfg.sponsored_marker) {
            continue;
        }
        if let Some(img) = container.select(&cfg.image).next() {
            if let Some(src) = img.value().attr("src").filter(|v| !v.is_empty()) {
                candidates.insert(src.to_string());
            }
        }
    }
    candidates.into_vec()
}
