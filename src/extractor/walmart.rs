use super::traits::{BreadcrumbSplit, ProductExtractor, SiteRules};
use super::Site;

static RULES: SiteRules = SiteRules {
    id_marker: "ip",
    id_char: |c| c.is_ascii_digit(),
    title: r#"[data-testid="product-title"]"#,
    price: r#"[data-testid="price-value"]"#,
    image: r#"[data-testid="hero-image"]"#,
    breadcrumb: ".breadcrumb",
    breadcrumb_split: BreadcrumbSplit::FirstSegment('/'),
    details: &[r#"[data-testid="product-description-content"]"#],
};

pub struct WalmartExtractor;

impl ProductExtractor for WalmartExtractor {
    fn site(&self) -> Site {
        Site::Walmart
    }

    fn rules(&self) -> &SiteRules {
        &RULES
    }
}
