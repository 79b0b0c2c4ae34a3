//! LRU cache of ranked results keyed by corpus generation and folded query
use super::SearchResult;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub generation: u64,
    pub query: String,
}

/// Result cache; a capacity of 0 disables it.
pub struct QueryCache {
    entries: Option<Mutex<LruCache<CacheKey, Vec<SearchResult>>>>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        self.entries.as_ref()?.lock().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, results: Vec<SearchResult>) {
        if let Some(entries) = &self.entries {
            entries.lock().put(key, results);
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::technique::Technique;
    use std::sync::Arc;

    fn key(generation: u64, query: &str) -> CacheKey {
        CacheKey {
            generation,
            query: query.to_string(),
        }
    }

    fn hit() -> Vec<SearchResult> {
        vec![SearchResult {
            technique: Arc::new(Technique::new("1", "XSS", "Web", "script")),
            score: 100,
        }]
    }

    #[test]
    fn stores_and_evicts_least_recent() {
        let cache = QueryCache::new(1);
        cache.insert(key(0, "xss"), hit());
        assert_eq!(cache.get(&key(0, "xss")), Some(hit()));

        cache.insert(key(0, "sql"), Vec::new());
        assert!(cache.get(&key(0, "xss")).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn generations_do_not_collide() {
        let cache = QueryCache::new(4);
        cache.insert(key(0, "xss"), hit());
        assert!(cache.get(&key(1, "xss")).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = QueryCache::new(0);
        assert!(!cache.is_enabled());
        cache.insert(key(0, "xss"), hit());
        assert!(cache.get(&key(0, "xss")).is_none());
    }
}
