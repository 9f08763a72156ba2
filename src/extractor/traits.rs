use super::Site;
use crate::model::{ExtractError, ProductDescriptor};
use scraper::{ElementRef, Html, Selector};

/// How a breadcrumb trail is cut down to its top-level category.
#[derive(Debug, Clone, Copy)]
pub enum BreadcrumbSplit {
    FirstLine,
    FirstSegment(char),
}

/// CSS selectors and URL rules for one storefront.
pub struct SiteRules {
    /// Path marker preceding the product id, e.g. `dp` for `/dp/B01ABC`.
    pub id_marker: &'static str,
    pub id_char: fn(char) -> bool,
    pub title: &'static str,
    pub price: &'static str,
    pub image: &'static str,
    pub breadcrumb: &'static str,
    pub breadcrumb_split: BreadcrumbSplit,
    pub details: &'static [&'static str],
}

/// Site-specific product scraping.
pub trait ProductExtractor: Send + Sync {
    fn site(&self) -> Site;

    fn rules(&self) -> &SiteRules;

    fn is_product_page(&self, path: &str) -> bool {
        path.contains(&format!("/{}/", self.rules().id_marker))
    }

    fn product_id(&self, path: &str) -> Option<String> {
        let rules = self.rules();
        segment_after(path, rules.id_marker, rules.id_char)
    }

    fn extract(&self, path: &str, html: &str) -> Result<ProductDescriptor, ExtractError> {
        let rules = self.rules();
        let document = Html::parse_document(html);

        let title = first_text(&document, rules.title)?;
        let price = first_text(&document, rules.price)?;
        let image_url = first_attr(&document, rules.image, "src")?;
        let category = first_text(&document, rules.breadcrumb)?
            .and_then(|trail| top_category(&trail, rules.breadcrumb_split));

        let mut details = Vec::new();
        for selector in rules.details {
            details.extend(all_text(&document, selector)?);
        }
        let details_text = if details.is_empty() {
            None
        } else {
            Some(details.join(" "))
        };

        Ok(ProductDescriptor {
            id: self.product_id(path),
            source: Some(self.site().name().to_string()),
            category,
            title,
            details_text,
            price,
            image_url,
        })
    }
}

/// First non-empty run of `id_char` characters following `/{marker}/` in `path`.
pub fn segment_after(path: &str, marker: &str, id_char: fn(char) -> bool) -> Option<String> {
    let needle = format!("/{}/", marker);
    path.match_indices(&needle)
        .map(|(idx, _)| {
            path[idx + needle.len()..]
                .chars()
                .take_while(|&c| id_char(c))
                .collect::<String>()
        })
        .find(|id| !id.is_empty())
}

fn top_category(trail: &str, split: BreadcrumbSplit) -> Option<String> {
    let trail = trail.trim();
    let head = match split {
        BreadcrumbSplit::FirstLine => trail.split('\n').next(),
        BreadcrumbSplit::FirstSegment(sep) => trail.split(sep).next(),
    };
    head.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector(format!("{}: {}", selector, e)))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first_text(document: &Html, selector: &str) -> Result<Option<String>, ExtractError> {
    let selector = parse_selector(selector)?;
    Ok(document
        .select(&selector)
        .next()
        .map(element_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Result<Option<String>, ExtractError> {
    let selector = parse_selector(selector)?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string))
}

fn all_text(document: &Html, selector: &str) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector(selector)?;
    Ok(document
        .select(&selector)
        .map(element_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_after_skips_empty_captures() {
        let digits = |c: char| c.is_ascii_digit();
        assert_eq!(segment_after("/ip/name/ip/42?x", "ip", digits), Some("42".into()));
        assert_eq!(segment_after("/ip/name/123", "ip", digits), None);
        assert_eq!(segment_after("/itm/", "itm", digits), None);
    }

    #[test]
    fn top_category_cuts_breadcrumb() {
        assert_eq!(
            top_category("\n  Home & Kitchen \n › Storage", BreadcrumbSplit::FirstLine),
            Some("Home & Kitchen".into())
        );
        assert_eq!(
            top_category(" Household / Cleaning / Sponges", BreadcrumbSplit::FirstSegment('/')),
            Some("Household".into())
        );
        assert_eq!(top_category("   ", BreadcrumbSplit::FirstLine), None);
    }
}
