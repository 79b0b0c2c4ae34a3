//! Technique search engine: ranking policies, result cache and the facade
pub mod cache;
pub mod engine;
pub mod ranking;

use crate::technique::Technique;
use serde::Serialize;
use std::sync::Arc;

pub use engine::SearchEngine;
pub use ranking::{ExactRelevance, FuzzyRelevance, RelevanceScorer};

/// A ranked hit. `score` is 100 for exact matches, graded for fuzzy ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub technique: Arc<Technique>,
    pub score: u8,
}
