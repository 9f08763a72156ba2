use crate::model::{AlternativeCandidate, CatalogError};

/// Returns the candidate with `id`, or `NotFound` so callers can tell a missing id from an empty catalog.
pub fn find_by_id<'a>(
    catalog: &'a [AlternativeCandidate],
    id: &str,
) -> Result<&'a AlternativeCandidate, CatalogError> {
    catalog
        .iter()
        .find(|alt| alt.id == id)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}
