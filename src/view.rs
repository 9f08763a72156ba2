// Presentation state for a ranked alternatives list.
use crate::model::{AlternativeCandidate, ProductDescriptor, RankedCandidate, SavedAlternative};
use crate::utils::{format_price, format_timestamp, parse_price};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

const MAX_FEATURES: usize = 3;
const MAX_DESCRIPTION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Keep the ranked order.
    #[default]
    Relevance,
    EcoScore,
    PriceLow,
    PriceHigh,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Category(category) => category,
        }
    }
}

impl CategoryFilter {
    fn accepts(&self, alt: &AlternativeCandidate) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => alt.replaces.iter().any(|r| r == category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcoTier {
    High,
    Medium,
    Low,
    VeryLow,
}

impl EcoTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            EcoTier::High
        } else if score >= 7.0 {
            EcoTier::Medium
        } else if score >= 5.0 {
            EcoTier::Low
        } else {
            EcoTier::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EcoTier::High => "high",
            EcoTier::Medium => "medium",
            EcoTier::Low => "low",
            EcoTier::VeryLow => "very-low",
        }
    }
}

/// Score shown to the user: 5 plus half a point per eco feature, capped at 10.
pub fn display_eco_score(alt: &AlternativeCandidate) -> f64 {
    (5.0 + alt.eco_features.len() as f64 * 0.5).min(10.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub title: String,
    pub price: String,
    pub category: String,
}

impl ProductSummary {
    pub fn from_descriptor(product: &ProductDescriptor) -> Self {
        Self {
            title: product
                .title
                .clone()
                .unwrap_or_else(|| "Unknown Product".to_string()),
            price: product
                .price
                .as_deref()
                .map(format_price)
                .unwrap_or_else(|| "Price not available".to_string()),
            category: format!("Category: {}", product.category().unwrap_or("Unknown")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeRow {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: String,
    pub description: String,
    pub features: Vec<String>,
    pub eco_score: f64,
    pub eco_tier: EcoTier,
    pub relevance_score: Option<u32>,
    pub purchase_url: Option<String>,
    pub saved: bool,
    pub saved_at: Option<String>,
}

impl AlternativeRow {
    fn new(alt: &AlternativeCandidate, relevance_score: Option<u32>, saved: bool) -> Self {
        let eco_score = display_eco_score(alt);
        Self {
            id: alt.id.clone(),
            name: or_placeholder(&alt.name, "No Name"),
            brand: or_placeholder(&alt.brand, "No Brand"),
            price: alt
                .price
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(format_price)
                .unwrap_or_else(|| "Price not available".to_string()),
            description: short_description(&alt.description),
            features: alt.eco_features.iter().take(MAX_FEATURES).cloned().collect(),
            eco_score,
            eco_tier: EcoTier::from_score(eco_score),
            relevance_score,
            purchase_url: alt.purchase_url.clone(),
            saved,
            saved_at: None,
        }
    }

    /// Rows for the saved list, in save order.
    pub fn saved_rows(saved: &[SavedAlternative]) -> Vec<AlternativeRow> {
        saved
            .iter()
            .map(|s| AlternativeRow {
                saved_at: Some(format_timestamp(s.saved_at)),
                ..AlternativeRow::new(&s.candidate, None, true)
            })
            .collect()
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn short_description(description: &str) -> String {
    if description.is_empty() {
        return "No description available.".to_string();
    }
    if description.chars().count() > MAX_DESCRIPTION {
        let head: String = description.chars().take(MAX_DESCRIPTION - 3).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// What the popup shows for one match result.
///
/// Built from the ranked list and the current selections; changing a selection builds a
/// new state instead of mutating this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub product: Option<ProductSummary>,
    pub categories: Vec<String>,
    pub filter: CategoryFilter,
    pub sort: SortBy,
    pub rows: Vec<AlternativeRow>,
    ranked: Vec<RankedCandidate>,
    saved_ids: HashSet<String>,
}

impl ViewState {
    pub fn build(
        product: Option<&ProductDescriptor>,
        ranked: &[RankedCandidate],
        filter: CategoryFilter,
        sort: SortBy,
        saved_ids: &HashSet<String>,
    ) -> Self {
        let categories: BTreeSet<&str> = ranked
            .iter()
            .flat_map(|r| r.candidate.replaces.iter().map(String::as_str))
            .collect();

        let mut visible: Vec<&RankedCandidate> = ranked
            .iter()
            .filter(|r| filter.accepts(&r.candidate))
            .collect();

        match sort {
            SortBy::Relevance => {}
            SortBy::EcoScore => visible.sort_by(|a, b| {
                display_eco_score(&b.candidate).total_cmp(&display_eco_score(&a.candidate))
            }),
            SortBy::PriceLow => visible.sort_by(|a, b| price_of(a).total_cmp(&price_of(b))),
            SortBy::PriceHigh => visible.sort_by(|a, b| price_of(b).total_cmp(&price_of(a))),
        }

        let rows = visible
            .into_iter()
            .map(|r| {
                AlternativeRow::new(
                    &r.candidate,
                    Some(r.relevance_score),
                    saved_ids.contains(&r.candidate.id),
                )
            })
            .collect();

        Self {
            product: product.map(ProductSummary::from_descriptor),
            categories: categories.into_iter().map(str::to_string).collect(),
            filter,
            sort,
            rows,
            ranked: ranked.to_vec(),
            saved_ids: saved_ids.clone(),
        }
    }

    pub fn with_filter(&self, filter: CategoryFilter) -> Self {
        self.rebuild(filter, self.sort)
    }

    pub fn with_sort(&self, sort: SortBy) -> Self {
        self.rebuild(self.filter.clone(), sort)
    }

    fn rebuild(&self, filter: CategoryFilter, sort: SortBy) -> Self {
        let mut next = Self::build(None, &self.ranked, filter, sort, &self.saved_ids);
        next.product = self.product.clone();
        next
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(product) = &self.product {
            writeln!(f, "{} | {} | {}", product.title, product.price, product.category)?;
        }
        if self.rows.is_empty() {
            return writeln!(f, "No eco-friendly alternatives found matching your criteria.");
        }
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>2}. {} ({}) - {} [eco {:.1} {}]{}",
                i + 1,
                row.name,
                row.brand,
                row.price,
                row.eco_score,
                row.eco_tier.as_str(),
                if row.saved { " *saved*" } else { "" }
            )?;
            writeln!(f, "    {}", row.description)?;
            if !row.features.is_empty() {
                writeln!(f, "    {}", row.features.join(", "))?;
            }
            if let Some(url) = &row.purchase_url {
                writeln!(f, "    {}", url)?;
            }
        }
        Ok(())
    }
}

fn price_of(ranked: &RankedCandidate) -> f64 {
    ranked.candidate.price.as_deref().map(parse_price).unwrap_or(0.0)
}
