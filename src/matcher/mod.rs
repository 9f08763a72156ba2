// Matcher module: ranks catalog alternatives against a product and looks them up by id.

pub mod lookup;
pub mod ranking;

pub use lookup::find_by_id;
pub use ranking::{match_alternatives, relevance_score, MatchStage};

use crate::catalog::CatalogLoader;
use crate::model::{AlternativeCandidate, CatalogError, ProductDescriptor, RankedCandidate};
use tracing::info;

/// Interface of the alternatives matcher.
pub trait Matcher {
    /// Loads the catalog and ranks it against `product`.
    fn find_alternatives(
        &self,
        product: &ProductDescriptor,
    ) -> Result<Vec<RankedCandidate>, CatalogError>;

    /// Loads the catalog and returns the candidate with the given id.
    fn alternative_details(&self, id: &str) -> Result<AlternativeCandidate, CatalogError>;
}

/// Matcher backed by a catalog loader; the catalog is reloaded on every call.
pub struct MatcherImpl<L: CatalogLoader> {
    loader: L,
}

impl<L: CatalogLoader> MatcherImpl<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }
}

impl<L: CatalogLoader> Matcher for MatcherImpl<L> {
    fn find_alternatives(
        &self,
        product: &ProductDescriptor,
    ) -> Result<Vec<RankedCandidate>, CatalogError> {
        let catalog = self.loader.load()?;
        let ranked = match_alternatives(product, &catalog);
        info!(
            "Matched {} of {} alternatives for product {}",
            ranked.len(),
            catalog.len(),
            product.id.as_deref().unwrap_or("<unknown>")
        );
        Ok(ranked)
    }

    fn alternative_details(&self, id: &str) -> Result<AlternativeCandidate, CatalogError> {
        let catalog = self.loader.load()?;
        find_by_id(&catalog, id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalogLoader;

    struct FailingLoader;

    impl CatalogLoader for FailingLoader {
        fn load(&self) -> Result<Vec<AlternativeCandidate>, CatalogError> {
            Err(CatalogError::Unavailable("disk on fire".into()))
        }
    }

    fn candidate(id: &str, eco_score: f64) -> AlternativeCandidate {
        AlternativeCandidate {
            id: id.into(),
            name: String::new(),
            brand: String::new(),
            price: None,
            description: String::new(),
            eco_features: Vec::new(),
            image_url: None,
            purchase_url: None,
            replaces: vec!["Kitchen".into()],
            keywords: Vec::new(),
            eco_score,
        }
    }

    #[test]
    fn loader_failure_is_propagated() {
        let matcher = MatcherImpl::new(FailingLoader);
        let err = matcher
            .find_alternatives(&ProductDescriptor::default())
            .unwrap_err();
        assert_eq!(err, CatalogError::Unavailable("disk on fire".into()));
        assert!(matches!(
            matcher.alternative_details("a"),
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[test]
    fn details_found_and_missing() {
        let matcher = MatcherImpl::new(StaticCatalogLoader::new(vec![
            candidate("a", 5.0),
            candidate("b", 6.0),
        ]));
        assert_eq!(matcher.alternative_details("b").unwrap().eco_score, 6.0);
        assert_eq!(
            matcher.alternative_details("Z").unwrap_err(),
            CatalogError::NotFound("Z".into())
        );
    }

    #[test]
    fn find_alternatives_ranks_loaded_catalog() {
        let matcher = MatcherImpl::new(StaticCatalogLoader::new(vec![
            candidate("a", 5.0),
            candidate("b", 6.0),
        ]));
        let product = ProductDescriptor {
            category: Some("kitchen".into()),
            ..Default::default()
        };
        let ranked = matcher.find_alternatives(&product).unwrap();
        let ids: Vec<_> = ranked.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(ranked.iter().all(|r| r.relevance_score == 3));
    }
}
