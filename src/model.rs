// Core structs: ProductDescriptor, AlternativeCandidate, RankedCandidate
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product data harvested from a storefront page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub details_text: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductDescriptor {
    /// Category label, if present and non-empty.
    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    /// True when either `title` or `details_text` carries text.
    pub fn has_text(&self) -> bool {
        non_empty(&self.title).is_some() || non_empty(&self.details_text).is_some()
    }

    /// Lowercased `title + " " + details_text`, absent fields as empty strings.
    pub fn search_text(&self) -> String {
        let title = self.title.as_deref().unwrap_or("");
        let details = self.details_text.as_deref().unwrap_or("");
        format!("{} {}", title, details).to_lowercase()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// One entry of the static alternatives catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeCandidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub eco_features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub purchase_url: Option<String>,
    #[serde(default)]
    pub replaces: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub eco_score: f64,
}

/// A candidate augmented with the relevance score of one matching call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: AlternativeCandidate,
    pub relevance_score: u32,
}

/// An alternative the user kept in the saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAlternative {
    #[serde(flatten)]
    pub candidate: AlternativeCandidate,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("alternative not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unsupported site: {0}")]
    UnsupportedSite(String),
    #[error("not a product page: {0}")]
    NotAProductPage(String),
    #[error("no product id in {0}")]
    MissingProductId(String),
    #[error("selector error: {0}")]
    Selector(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response status: {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("background service is closed")]
    Closed,
    #[error("background service dropped the reply")]
    NoReply,
}
