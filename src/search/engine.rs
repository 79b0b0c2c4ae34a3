//! Search engine facade over the current record store
use super::cache::{CacheKey, QueryCache};
use super::ranking::{rank, ExactRelevance, FuzzyRelevance};
use super::SearchResult;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::store::RecordStore;
use crate::technique::Technique;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
struct Snapshot {
    store: Arc<RecordStore>,
    generation: u64,
}

/// Answers queries against an immutable [`RecordStore`].
///
/// The store is swapped as a whole on [`SearchEngine::reload`]; every call
/// works on the snapshot current when it started.
pub struct SearchEngine {
    config: EngineConfig,
    current: RwLock<Snapshot>,
    cache: QueryCache,
    metrics: Arc<Metrics>,
}

impl SearchEngine {
    pub fn new(config: EngineConfig, store: RecordStore) -> Result<Self> {
        Self::with_metrics(config, store, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(
        config: EngineConfig,
        store: RecordStore,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        config.validate()?;
        metrics.techniques_loaded.set(store.len() as i64);
        debug!(
            "Search engine ready: algorithm={}, max_results={}, techniques={}",
            config.algorithm,
            config.max_results,
            store.len()
        );

        Ok(Self {
            cache: QueryCache::new(config.cache_size),
            config,
            current: RwLock::new(Snapshot {
                store: Arc::new(store),
                generation: 0,
            }),
            metrics,
        })
    }

    fn snapshot(&self) -> Snapshot {
        self.current.read().clone()
    }

    /// Ranked matches for `query`, at most `max_results` of them.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.metrics.searches_total.inc();

        let query = query.trim();
        if query.chars().count() < self.config.min_query_length {
            debug!("Rejecting query shorter than {} characters", self.config.min_query_length);
            self.metrics.searches_rejected.inc();
            return Vec::new();
        }
        let query = query.to_lowercase();

        let snapshot = self.snapshot();
        let key = CacheKey {
            generation: snapshot.generation,
            query,
        };
        if let Some(results) = self.cache.get(&key) {
            self.metrics.cache_hits.inc();
            self.metrics.results_returned.inc_by(results.len() as u64);
            return results;
        }

        let start = Instant::now();
        let records = snapshot.store.records();
        let limit = self.config.max_results;
        let results = match self.config.algorithm.matcher_kind() {
            Some(kind) => rank(records, &ExactRelevance::new(kind, &key.query), limit),
            None => rank(
                records,
                &FuzzyRelevance::new(&key.query, self.config.fuzzy_threshold),
                limit,
            ),
        };
        debug!(
            "Query '{}' ({}) matched {} of {} techniques in {:.2?}",
            key.query,
            self.config.algorithm,
            results.len(),
            records.len(),
            start.elapsed()
        );

        self.metrics.results_returned.inc_by(results.len() as u64);
        self.cache.insert(key, results.clone());
        results
    }

    pub fn get_by_id(&self, id: &str) -> Option<Arc<Technique>> {
        self.snapshot().store.get(id).cloned()
    }

    pub fn get_by_category(&self, category: &str) -> Vec<Arc<Technique>> {
        self.snapshot().store.by_category(category)
    }

    pub fn get_categories(&self) -> Vec<String> {
        self.snapshot().store.categories()
    }

    /// Replace the whole corpus. Searches already running finish on the old one.
    pub fn reload(&self, store: RecordStore) {
        let count = store.len();
        {
            let mut current = self.current.write();
            *current = Snapshot {
                store: Arc::new(store),
                generation: current.generation + 1,
            };
        }
        self.cache.clear();
        self.metrics.corpus_reloads.inc();
        self.metrics.techniques_loaded.set(count as i64);
        debug!("Corpus replaced, {count} techniques available");
    }

    pub fn technique_count(&self) -> usize {
        self.snapshot().store.len()
    }

    pub fn store(&self) -> Arc<RecordStore> {
        self.snapshot().store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_algorithms::Algorithm;

    fn engine(algorithm: Algorithm) -> SearchEngine {
        let store = RecordStore::new(vec![
            Technique::new("1", "SQL Injection", "Web Security", "Database query tampering"),
            Technique::new("2", "Phishing", "Social Engineering", "Deceptive email"),
        ])
        .unwrap();
        SearchEngine::new(EngineConfig::default().with_algorithm(algorithm), store).unwrap()
    }

    #[test]
    fn repeated_queries_are_served_from_cache() {
        let engine = engine(Algorithm::BoyerMoore);
        let first = engine.search("sql");
        let second = engine.search("  SQL ");
        assert_eq!(first, second);
        assert_eq!(engine.metrics().cache_hits.get(), 1);
        assert_eq!(engine.metrics().searches_total.get(), 2);
    }

    #[test]
    fn reload_swaps_corpus_and_invalidates_cache() {
        let engine = engine(Algorithm::Kmp);
        assert_eq!(engine.search("phishing").len(), 1);

        engine.reload(RecordStore::new(vec![Technique::new("9", "Vishing", "Social Engineering", "Voice")]).unwrap());
        assert!(engine.search("phishing").is_empty());
        assert_eq!(engine.search("vishing")[0].technique.id, "9");
        assert!(engine.get_by_id("1").is_none());
        assert_eq!(engine.technique_count(), 1);
        assert_eq!(engine.metrics().corpus_reloads.get(), 1);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = EngineConfig::default().with_max_results(0);
        assert!(SearchEngine::new(config, RecordStore::empty()).is_err());
    }

    #[test]
    fn rejected_queries_are_counted() {
        let engine = engine(Algorithm::Fuzzy);
        assert!(engine.search(" a ").is_empty());
        assert_eq!(engine.metrics().searches_rejected.get(), 1);
    }
}
