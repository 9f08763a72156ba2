use super::traits::{BreadcrumbSplit, ProductExtractor, SiteRules};
use super::Site;

static RULES: SiteRules = SiteRules {
    id_marker: "dp",
    id_char: |c| c.is_ascii_uppercase() || c.is_ascii_digit(),
    title: "#productTitle",
    price: ".a-price .a-offscreen",
    image: "#landingImage",
    breadcrumb: "#wayfinding-breadcrumbs_feature_div",
    breadcrumb_split: BreadcrumbSplit::FirstLine,
    details: &["#feature-bullets", "#productDescription"],
};

pub struct AmazonExtractor;

impl ProductExtractor for AmazonExtractor {
    fn site(&self) -> Site {
        Site::Amazon
    }

    fn rules(&self) -> &SiteRules {
        &RULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="wayfinding-breadcrumbs_feature_div">
            <ul><li>Home &amp; Kitchen</li>
            <li>Kitchen &amp; Dining</li></ul>
          </div>
          <span id="productTitle">  Plastic Food Storage Bags, 100 Count  </span>
          <span class="a-price"><span class="a-offscreen">$12.49</span></span>
          <img id="landingImage" src="https://images.example/bags.jpg">
          <div id="feature-bullets"><ul><li>Leak-proof zipper seal</li></ul></div>
        </body></html>
    "#;

    #[test]
    fn extracts_product_fields() {
        let descriptor = AmazonExtractor
            .extract("/Storage-Bags/dp/B07XYZ1234/ref=sr_1_1", PAGE)
            .unwrap();
        assert_eq!(descriptor.id.as_deref(), Some("B07XYZ1234"));
        assert_eq!(descriptor.source.as_deref(), Some("amazon"));
        assert_eq!(descriptor.category.as_deref(), Some("Home & Kitchen"));
        assert_eq!(
            descriptor.title.as_deref(),
            Some("Plastic Food Storage Bags, 100 Count")
        );
        assert_eq!(descriptor.price.as_deref(), Some("$12.49"));
        assert_eq!(
            descriptor.image_url.as_deref(),
            Some("https://images.example/bags.jpg")
        );
        assert_eq!(descriptor.details_text.as_deref(), Some("Leak-proof zipper seal"));
    }

    #[test]
    fn product_page_detection() {
        assert!(AmazonExtractor.is_product_page("/gp/dp/B000000001"));
        assert!(!AmazonExtractor.is_product_page("/s?k=bags"));
        assert_eq!(AmazonExtractor.product_id("/dp/b000lower"), None);
    }

    #[test]
    fn missing_elements_are_none() {
        let descriptor = AmazonExtractor.extract("/dp/B01", "<html></html>").unwrap();
        assert_eq!(descriptor.id.as_deref(), Some("B01"));
        assert_eq!(descriptor.category, None);
        assert_eq!(descriptor.title, None);
        assert_eq!(descriptor.details_text, None);
    }
}
