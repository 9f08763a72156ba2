// Extractor module: storefront detection and per-site product scraping.

pub mod amazon;
pub mod ebay;
pub mod target;
pub mod traits;
pub mod walmart;

pub use amazon::AmazonExtractor;
pub use ebay::EbayExtractor;
pub use target::TargetExtractor;
pub use traits::{ProductExtractor, SiteRules};
pub use walmart::WalmartExtractor;

use crate::model::{ExtractError, ProductDescriptor};
use crate::normalizer::normalize_descriptor;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported storefronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Amazon,
    Walmart,
    Target,
    Ebay,
}

impl Site {
    pub const ALL: [Site; 4] = [Site::Amazon, Site::Walmart, Site::Target, Site::Ebay];

    pub fn name(&self) -> &'static str {
        match self {
            Site::Amazon => "amazon",
            Site::Walmart => "walmart",
            Site::Target => "target",
            Site::Ebay => "ebay",
        }
    }

    fn domains(&self) -> &'static [&'static str] {
        match self {
            Site::Amazon => &["amazon.com", "amazon.in"],
            Site::Walmart => &["walmart.com"],
            Site::Target => &["target.com"],
            Site::Ebay => &["ebay.com"],
        }
    }
}

pub fn detect_site(host: &str) -> Option<Site> {
    let host = host.to_lowercase();
    Site::ALL
        .into_iter()
        .find(|site| site.domains().iter().any(|d| host.contains(d)))
}

pub fn extractor_for(site: Site) -> Box<dyn ProductExtractor> {
    match site {
        Site::Amazon => Box::new(AmazonExtractor),
        Site::Walmart => Box::new(WalmartExtractor),
        Site::Target => Box::new(TargetExtractor),
        Site::Ebay => Box::new(EbayExtractor),
    }
}

/// Detects the storefront of `url`, scrapes `html` with its extractor and normalizes the result.
pub fn extract_from_url(url: &str, html: &str) -> Result<ProductDescriptor, ExtractError> {
    let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(format!("{}: {}", url, e)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ExtractError::InvalidUrl(url.to_string()))?;
    let site = detect_site(host).ok_or_else(|| ExtractError::UnsupportedSite(host.to_string()))?;

    let extractor = extractor_for(site);
    let path = parsed.path();
    if !extractor.is_product_page(path) {
        return Err(ExtractError::NotAProductPage(url.to_string()));
    }

    let descriptor = normalize_descriptor(extractor.extract(path, html)?);
    if descriptor.id.is_none() {
        return Err(ExtractError::MissingProductId(url.to_string()));
    }
    debug!(
        "Extracted {} product {:?} in category {:?}",
        site.name(),
        descriptor.id,
        descriptor.category
    );
    Ok(descriptor)
}
