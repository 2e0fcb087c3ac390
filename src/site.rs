use clap::ValueEnum;
use scraper::Selector;
use url::Url;

use crate::extract::{
    AttributeScanConfig, ExtractionStrategy, GalleryScopedConfig, ResultListConfig,
};

/// Supported sites. Each maps to one extraction strategy tuned to that
/// site's markup conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Site {
    /// fairwaygolfusa.com product pages.
    Fairway,
    /// tradeinn.com product pages (swiper gallery).
    Tradeinn,
    /// Amazon search-result pages.
    AmazonSearch,
}

impl Site {
    pub fn strategy(self) -> ExtractionStrategy {
        match self {
            Site::Fairway => ExtractionStrategy::AttributeScan(AttributeScanConfig {
                site_root: Url::parse("https://www.fairwaygolfusa.com").unwrap(),
                asset_marker: "resources/upload/products/".to_string(),
                thumbnail_markers: vec!["thumbnail".to_string(), "thumb".to_string()],
            }),
            Site::Tradeinn => ExtractionStrategy::GalleryScoped(GalleryScopedConfig {
                site_root: Url::parse("https://www.tradeinn.com").unwrap(),
                container: Selector::parse("div.swiper-wrapper").unwrap(),
                asset_marker: "/f/".to_string(),
                thumbnail_markers: vec!["thumb".to_string()],
            }),
            Site::AmazonSearch => ExtractionStrategy::ResultList(ResultListConfig {
                container: Selector::parse(r#"div[data-component-type="s-search-result"]"#)
                    .unwrap(),
                image: Selector::parse("img.s-image").unwrap(),
                sponsored_marker: "Sponsored".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_site_builds_a_strategy() {
        // Selector and URL literals are checked here so a bad preset fails
        // in tests instead of at runtime.
        for site in [Site::Fairway, Site::Tradeinn, Site::AmazonSearch] {
            let _ = site.strategy();
        }
    }
}
