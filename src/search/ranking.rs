//! The two ranking policies and the shared rank/sort/truncate pass
use super::SearchResult;
use crate::fuzzy::FuzzyScorer;
use crate::search_algorithms::{Matcher, MatcherKind, PatternMatcher};
use crate::store::StoredTechnique;
use rayon::prelude::*;
use std::sync::Arc;

/// Decides whether a record is relevant to the current query and how much.
pub trait RelevanceScorer: Sync {
    /// `None` excludes the record, otherwise a score in `0..=100`.
    fn score(&self, record: &StoredTechnique) -> Option<u8>;
}

/// Boolean relevance: a hit in `name` or `description` scores 100.
#[derive(Debug, Clone)]
pub struct ExactRelevance {
    matcher: Matcher,
}

impl ExactRelevance {
    pub fn new(kind: MatcherKind, query: &str) -> Self {
        Self {
            matcher: Matcher::new(kind, query),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl RelevanceScorer for ExactRelevance {
    fn score(&self, record: &StoredTechnique) -> Option<u8> {
        let hit = self.matcher.is_match_folded(&record.name_folded)
            || self.matcher.is_match_folded(&record.description_folded);
        hit.then_some(100)
    }
}

/// Graded relevance: best fuzzy score over `name`, `description` and
/// `category`, kept when it reaches the threshold.
#[derive(Debug, Clone)]
pub struct FuzzyRelevance {
    scorer: FuzzyScorer,
    threshold: u8,
}

impl FuzzyRelevance {
    pub fn new(query: &str, threshold: u8) -> Self {
        Self {
            scorer: FuzzyScorer::new(query),
            threshold,
        }
    }
}

impl RelevanceScorer for FuzzyRelevance {
    fn score(&self, record: &StoredTechnique) -> Option<u8> {
        let best = [
            &record.name_folded,
            &record.description_folded,
            &record.category_folded,
        ]
        .into_iter()
        .map(|field| self.scorer.score(field))
        .max()
        .unwrap_or(0);

        (best >= self.threshold).then_some(best)
    }
}

/// Score every record, order by score descending (ties keep corpus order)
/// and keep at most `limit`.
pub fn rank<S: RelevanceScorer>(
    records: &[StoredTechnique],
    scorer: &S,
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = records
        .par_iter()
        .filter_map(|record| {
            scorer.score(record).map(|score| SearchResult {
                technique: Arc::clone(&record.technique),
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(limit);
    results
}
