//! Time-bounded query result cache.
//!
//! Entries are keyed by `(kind, query, max_results)` and expire after a TTL
//! (300 seconds by default). The cache is deliberately `&mut`-only: callers
//! that share one across writers must serialize access themselves, matching
//! the single-writer discipline of the rest of the core.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use gwydion_types::{Fact, QueryKind};

use crate::engine::RetrievalEngine;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type CacheKey = (QueryKind, String, usize);

struct CacheEntry {
    facts: Vec<Fact>,
    inserted_at: Instant,
}

/// TTL cache over [`RetrievalEngine::query`] results.
pub struct QueryCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl QueryCache {
    /// Create a cache with the default 300-second TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with an explicit TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up a live entry, evicting it first when expired.
    pub fn get(&mut self, kind: QueryKind, query: &str, max_results: usize) -> Option<Vec<Fact>> {
        let key = (kind, query.to_string(), max_results);
        match self.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => Some(entry.facts.clone()),
            Some(_) => {
                self.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store a result set.
    pub fn insert(&mut self, kind: QueryKind, query: &str, max_results: usize, facts: Vec<Fact>) {
        self.entries.insert(
            (kind, query.to_string(), max_results),
            CacheEntry {
                facts,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Run a query through the cache: return the cached result when live,
    /// otherwise dispatch to the engine and remember the answer.
    pub fn fetch(
        &mut self,
        engine: &RetrievalEngine,
        kind: QueryKind,
        query: &str,
        max_results: usize,
    ) -> Vec<Fact> {
        if let Some(facts) = self.get(kind, query, max_results) {
            debug!(kind = %kind, query, "Query cache hit");
            return facts;
        }

        let facts = engine.query(kind, query, max_results);
        self.insert(kind, query, max_results, facts.clone());
        facts
    }

    /// Drop every expired entry.
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.inserted_at.elapsed() <= ttl);
    }

    /// Number of entries, including any not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwydion_knowledge::FactStore;
    use std::sync::Arc;

    fn engine() -> RetrievalEngine {
        let store = Arc::new(FactStore::new());
        store.add_fact("kitchen", "contains", "key").unwrap();
        RetrievalEngine::new(store)
    }

    #[test]
    fn test_fetch_populates_and_hits() {
        let engine = engine();
        let mut cache = QueryCache::new();

        let first = cache.fetch(&engine, QueryKind::Keywords, "kitchen", 5);
        assert_eq!(first.len(), 1);
        assert_eq!(cache.len(), 1);

        // A hit returns the cached facts even if the store moved meanwhile
        engine.store().add_fact("kitchen", "has", "stove").unwrap();
        let second = cache.fetch(&engine, QueryKind::Keywords, "kitchen", 5);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_key_includes_max_results() {
        let engine = engine();
        let mut cache = QueryCache::new();

        cache.fetch(&engine, QueryKind::Keywords, "kitchen", 5);
        cache.fetch(&engine, QueryKind::Keywords, "kitchen", 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_expired_entry_refetched() {
        let engine = engine();
        let mut cache = QueryCache::with_ttl(Duration::from_millis(5));

        cache.insert(QueryKind::Keywords, "kitchen", 5, Vec::new());
        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get(QueryKind::Keywords, "kitchen", 5).is_none());

        // A fetch after expiry goes back to the engine
        let facts = cache.fetch(&engine, QueryKind::Keywords, "kitchen", 5);
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = QueryCache::with_ttl(Duration::from_millis(5));
        cache.insert(QueryKind::Keywords, "a", 5, Vec::new());
        cache.insert(QueryKind::Entity, "b", 5, Vec::new());
        std::thread::sleep(Duration::from_millis(10));
        cache.insert(QueryKind::Hybrid, "c", 5, Vec::new());

        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = QueryCache::new();
        cache.insert(QueryKind::Keywords, "a", 5, Vec::new());
        cache.clear();
        assert!(cache.is_empty());
    }
}
