use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub searches_total: IntCounter,
    pub searches_rejected: IntCounter,
    pub results_returned: IntCounter,
    pub cache_hits: IntCounter,
    pub corpus_reloads: IntCounter,
    pub techniques_loaded: IntGauge,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::with_opts(Opts::new(name, help)).expect("static counter options are valid")
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let searches_total = counter("searches_total", "Number of search queries received");
        let searches_rejected = counter(
            "searches_rejected",
            "Number of queries rejected for being too short",
        );
        let results_returned = counter("results_returned", "Number of search results returned");
        let cache_hits = counter("cache_hits", "Number of searches answered from the cache");
        let corpus_reloads = counter("corpus_reloads", "Number of corpus replacements");
        let techniques_loaded = IntGauge::with_opts(Opts::new(
            "techniques_loaded",
            "Number of techniques in the current corpus",
        ))
        .expect("static gauge options are valid");

        registry.register(Box::new(searches_total.clone())).ok();
        registry.register(Box::new(searches_rejected.clone())).ok();
        registry.register(Box::new(results_returned.clone())).ok();
        registry.register(Box::new(cache_hits.clone())).ok();
        registry.register(Box::new(corpus_reloads.clone())).ok();
        registry.register(Box::new(techniques_loaded.clone())).ok();

        Metrics {
            searches_total,
            searches_rejected,
            results_returned,
            cache_hits,
            corpus_reloads,
            techniques_loaded,
            registry: Arc::new(registry),
        }
    }

    /// Prometheus text exposition of every registered metric.
    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
