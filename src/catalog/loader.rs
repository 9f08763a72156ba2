use crate::model::{AlternativeCandidate, CatalogError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of the full alternatives catalog.
///
/// Implementations return the whole catalog or fail; nothing is cached between calls.
pub trait CatalogLoader: Send + Sync {
    fn load(&self) -> Result<Vec<AlternativeCandidate>, CatalogError>;
}

/// Reads the catalog from a JSON file on every call.
pub struct JsonCatalogLoader {
    path: PathBuf,
}

impl JsonCatalogLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogLoader for JsonCatalogLoader {
    fn load(&self) -> Result<Vec<AlternativeCandidate>, CatalogError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CatalogError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let catalog = parse_catalog(&content)
            .map_err(|e| match e {
                CatalogError::Unavailable(msg) => {
                    CatalogError::Unavailable(format!("{}: {}", self.path.display(), msg))
                }
                other => other,
            })?;
        debug!("Loaded {} alternatives from {}", catalog.len(), self.path.display());
        Ok(catalog)
    }
}

/// Catalog held in memory.
pub struct StaticCatalogLoader {
    catalog: Vec<AlternativeCandidate>,
}

impl StaticCatalogLoader {
    pub fn new(catalog: Vec<AlternativeCandidate>) -> Self {
        Self { catalog }
    }
}

impl CatalogLoader for StaticCatalogLoader {
    fn load(&self) -> Result<Vec<AlternativeCandidate>, CatalogError> {
        Ok(self.catalog.clone())
    }
}

/// Parses a JSON array of candidates and checks that ids are present and unique.
pub fn parse_catalog(json: &str) -> Result<Vec<AlternativeCandidate>, CatalogError> {
    let catalog: Vec<AlternativeCandidate> =
        serde_json::from_str(json).map_err(|e| CatalogError::Unavailable(e.to_string()))?;

    let mut seen = HashSet::new();
    for candidate in &catalog {
        if candidate.id.is_empty() {
            return Err(CatalogError::Unavailable("candidate with empty id".into()));
        }
        if !seen.insert(candidate.id.as_str()) {
            return Err(CatalogError::Unavailable(format!(
                "duplicate candidate id '{}'",
                candidate.id
            )));
        }
        if !candidate.eco_score.is_finite() || !(0.0..=10.0).contains(&candidate.eco_score) {
            warn!(
                "Candidate '{}' has eco score {} outside 0-10",
                candidate.id, candidate.eco_score
            );
        }
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "id": "bamboo-brush",
            "name": "Bamboo Toothbrush",
            "brand": "GreenSmile",
            "price": "$4.99",
            "ecoFeatures": ["Biodegradable handle", "Plastic-free packaging"],
            "replaces": ["Toothbrushes", "Oral Care"],
            "keywords": ["toothbrush"],
            "ecoScore": 9.1
        },
        {
            "id": "steel-bottle",
            "replaces": ["Water Bottles"],
            "keywords": ["water bottle", "tumbler"],
            "ecoScore": 8
        }
    ]"#;

    #[test]
    fn parses_camel_case_fields() {
        let catalog = parse_catalog(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].eco_features.len(), 2);
        assert_eq!(catalog[0].price.as_deref(), Some("$4.99"));
        assert_eq!(catalog[1].name, "");
        assert_eq!(catalog[1].eco_score, 8.0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[{"id":"a","ecoScore":1},{"id":"a","ecoScore":2}]"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn malformed_json_is_unavailable() {
        assert!(matches!(
            parse_catalog("{not json"),
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let loader = JsonCatalogLoader::new("no/such/alternatives.json");
        let err = loader.load().unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(msg) if msg.contains("alternatives.json")));
    }

    #[test]
    fn static_loader_returns_full_catalog() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let loader = StaticCatalogLoader::new(catalog.clone());
        assert_eq!(loader.load().unwrap(), catalog);
    }
}
