use super::traits::{BreadcrumbSplit, ProductExtractor, SiteRules};
use super::Site;

static RULES: SiteRules = SiteRules {
    id_marker: "p",
    id_char: |c| c.is_ascii_alphanumeric() || c == '-',
    title: r#"[data-test="product-title"]"#,
    price: r#"[data-test="product-price"]"#,
    image: r#"[data-test="product-image"]"#,
    breadcrumb: ".breadcrumbs",
    breadcrumb_split: BreadcrumbSplit::FirstSegment('/'),
    details: &[r#"[data-test="item-details-description"]"#],
};

pub struct TargetExtractor;

impl ProductExtractor for TargetExtractor {
    fn site(&self) -> Site {
        Site::Target
    }

    fn rules(&self) -> &SiteRules {
        &RULES
    }
}
