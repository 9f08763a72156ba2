use super::traits::{BreadcrumbSplit, ProductExtractor, SiteRules};
use super::Site;

static RULES: SiteRules = SiteRules {
    id_marker: "itm",
    id_char: |c| c.is_ascii_digit(),
    title: "h1.x-item-title__mainTitle",
    price: r#"span[itemprop="price"]"#,
    image: "img#icImg",
    breadcrumb: ".breadcrumbs",
    breadcrumb_split: BreadcrumbSplit::FirstLine,
    details: &[".x-about-this-item", "#viTabs_0_is"],
};

pub struct EbayExtractor;

impl ProductExtractor for EbayExtractor {
    fn site(&self) -> Site {
        Site::Ebay
    }

    fn rules(&self) -> &SiteRules {
        &RULES
    }
}
