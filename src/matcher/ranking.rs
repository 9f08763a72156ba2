use crate::model::{AlternativeCandidate, ProductDescriptor, RankedCandidate};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

const CATEGORY_POINTS: u32 = 3;
const KEYWORD_POINTS: u32 = 2;

/// Selection stage that produced the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    ExactCategory,
    PartialCategory,
    Keyword,
    Fallback,
}

/// Ranks `catalog` against `product`.
///
/// Candidates are selected by the first stage that yields anything: exact category,
/// partial category, keyword, then the whole catalog. The selected set is scored and
/// sorted by relevance, then eco score; remaining ties keep catalog order.
pub fn match_alternatives(
    product: &ProductDescriptor,
    catalog: &[AlternativeCandidate],
) -> Vec<RankedCandidate> {
    let (stage, selected) = select_candidates(product, catalog);
    debug!("Selected {} candidates via {:?}", selected.len(), stage);

    let mut ranked: Vec<RankedCandidate> = selected
        .into_iter()
        .map(|alt| RankedCandidate {
            relevance_score: relevance_score(product, alt),
            candidate: alt.clone(),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.relevance_score
            .cmp(&a.relevance_score)
            .then_with(|| compare_eco_desc(&a.candidate, &b.candidate))
    });
    ranked
}

/// Runs the selection stages in priority order.
pub fn select_candidates<'a>(
    product: &ProductDescriptor,
    catalog: &'a [AlternativeCandidate],
) -> (MatchStage, Vec<&'a AlternativeCandidate>) {
    if let Some(category) = product.category() {
        let category = category.to_lowercase();

        let exact = filter(catalog, |alt| {
            alt.replaces.iter().any(|r| r.to_lowercase() == category)
        });
        if !exact.is_empty() {
            return (MatchStage::ExactCategory, exact);
        }

        let partial = filter(catalog, |alt| {
            alt.replaces.iter().any(|r| {
                let r = r.to_lowercase();
                category.contains(&r) || r.contains(&category)
            })
        });
        if !partial.is_empty() {
            return (MatchStage::PartialCategory, partial);
        }
    }

    if product.has_text() {
        let text = product.search_text();
        let by_keyword = filter(catalog, |alt| {
            alt.keywords.iter().any(|k| text.contains(&k.to_lowercase()))
        });
        if !by_keyword.is_empty() {
            return (MatchStage::Keyword, by_keyword);
        }
    }

    (MatchStage::Fallback, catalog.iter().collect())
}

/// Relevance of one candidate: +3 when the product category contains one of the
/// candidate's `replaces` entries, +2 per distinct keyword found in title/details.
pub fn relevance_score(product: &ProductDescriptor, alt: &AlternativeCandidate) -> u32 {
    let mut score = 0;

    // only category ⊇ replaces counts here, unlike the partial stage
    if let Some(category) = product.category() {
        let category = category.to_lowercase();
        if alt.replaces.iter().any(|r| category.contains(&r.to_lowercase())) {
            score += CATEGORY_POINTS;
        }
    }

    if product.has_text() {
        let text = product.search_text();
        let found: HashSet<String> = alt
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| text.contains(k.as_str()))
            .collect();
        score += KEYWORD_POINTS * found.len() as u32;
    }

    score
}

fn filter<'a, F>(catalog: &'a [AlternativeCandidate], keep: F) -> Vec<&'a AlternativeCandidate>
where
    F: Fn(&AlternativeCandidate) -> bool,
{
    catalog.iter().filter(|&alt| keep(alt)).collect()
}

fn compare_eco_desc(a: &AlternativeCandidate, b: &AlternativeCandidate) -> Ordering {
    b.eco_score.total_cmp(&a.eco_score)
}
