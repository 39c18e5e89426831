//! The retrieval engine: strategy dispatch over a shared fact store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gwydion_knowledge::FactStore;
use gwydion_types::{Fact, FactCategory, FactKey, QueryKind};

use crate::keyword::{extract_keywords, keyword_score};
use crate::tfidf::TfidfIndex;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tunables for the retrieval engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default result count when a caller passes no explicit limit.
    pub max_results: usize,
    /// Similarity results below this are discarded.
    pub similarity_threshold: f32,
    /// Keyword share of the hybrid blend.
    pub keyword_weight: f32,
    /// Similarity share of the hybrid blend.
    pub similarity_weight: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            similarity_threshold: 0.3,
            keyword_weight: 0.6,
            similarity_weight: 0.4,
        }
    }
}

/// A fact together with its retrieval score.
#[derive(Debug, Clone)]
pub struct ScoredFact {
    pub fact: Fact,
    pub score: f32,
}

/// Snapshot of engine state for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalStats {
    pub total_facts: usize,
    pub has_similarity_index: bool,
    pub max_results: usize,
    pub similarity_threshold: f32,
}

/// Similarity index cached against the store revision it was built from.
struct IndexCache {
    revision: u64,
    /// Facts as they were when the index was built, in document order.
    facts: Arc<Vec<Fact>>,
    index: Option<Arc<TfidfIndex>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Multi-strategy retrieval over a shared [`FactStore`].
///
/// Every operation is a pure read of the store. The TF-IDF index is rebuilt
/// lazily: each similarity query compares the cached index's revision against
/// the store's and rebuilds only when the store has moved.
pub struct RetrievalEngine {
    store: Arc<FactStore>,
    config: RetrievalConfig,
    cache: Mutex<Option<IndexCache>>,
}

impl RetrievalEngine {
    /// Create an engine over the given store with default configuration.
    pub fn new(store: Arc<FactStore>) -> Self {
        Self::with_config(store, RetrievalConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(store: Arc<FactStore>, config: RetrievalConfig) -> Self {
        Self {
            store,
            config,
            cache: Mutex::new(None),
        }
    }

    /// The store this engine reads from.
    pub fn store(&self) -> &Arc<FactStore> {
        &self.store
    }

    /// Unified dispatch: run a query of the given kind and return ranked
    /// facts with scores dropped.
    ///
    /// For [`QueryKind::Category`] the query may carry a `"TAG:text"` prefix
    /// (e.g. `"ACTION:key"`); without a recognizable tag the query degrades
    /// to keyword search. [`QueryKind::Contextual`] without separate context
    /// behaves like hybrid.
    pub fn query(&self, kind: QueryKind, query: &str, max_results: usize) -> Vec<Fact> {
        let results = match kind {
            QueryKind::Keywords => self.by_keywords(query, max_results),
            QueryKind::Similarity => self.by_similarity(query, max_results),
            QueryKind::Entity => self.by_entity(query, max_results),
            QueryKind::Relation => self.by_relation(query, max_results),
            QueryKind::Hybrid => self.hybrid(query, max_results),
            QueryKind::Contextual => self.contextual(query, &[], max_results),
            QueryKind::Category => match query.split_once(':') {
                Some((tag, rest)) => match FactCategory::from_tag(tag) {
                    Some(category) => {
                        let rest = rest.trim();
                        let rest = (!rest.is_empty()).then_some(rest);
                        self.by_category(category, rest, max_results)
                    }
                    None => self.by_keywords(query, max_results),
                },
                None => self.by_keywords(query, max_results),
            },
        };

        debug!(kind = %kind, query, results = results.len(), "Query dispatched");
        results.into_iter().map(|s| s.fact).collect()
    }

    /// Keyword retrieval: weighted overlap, confidence-scaled, descending.
    pub fn by_keywords(&self, query: &str, max_results: usize) -> Vec<ScoredFact> {
        let keywords = extract_keywords(query);
        let mut results: Vec<ScoredFact> = self
            .store
            .all_facts()
            .into_iter()
            .filter_map(|fact| {
                let score = keyword_score(&fact, &keywords);
                (score > 0.0).then_some(ScoredFact { fact, score })
            })
            .collect();

        sort_descending(&mut results);
        results.truncate(max_results);
        results
    }

    /// Similarity retrieval: TF-IDF cosine against every fact text, with
    /// results below the configured threshold discarded. Falls back to
    /// keyword retrieval when no index can be built.
    pub fn by_similarity(&self, query: &str, max_results: usize) -> Vec<ScoredFact> {
        let Some((facts, index)) = self.similarity_index() else {
            warn!("Similarity index unavailable, falling back to keyword search");
            return self.by_keywords(query, max_results);
        };

        let mut results: Vec<ScoredFact> = index
            .similarities(query)
            .into_iter()
            .zip(facts.iter())
            .filter_map(|(score, fact)| {
                (score > self.config.similarity_threshold).then(|| ScoredFact {
                    fact: fact.clone(),
                    score,
                })
            })
            .collect();

        sort_descending(&mut results);
        results.truncate(max_results);
        results
    }

    /// Hybrid retrieval: keyword and similarity results unioned and
    /// re-scored as `keyword_weight × keyword + similarity_weight ×
    /// similarity`, a missing half contributing zero.
    pub fn hybrid(&self, query: &str, max_results: usize) -> Vec<ScoredFact> {
        let keyword_results = self.by_keywords(query, max_results * 2);
        let similarity_results = self.by_similarity(query, max_results * 2);

        let keyword_scores: HashMap<FactKey, f32> = keyword_results
            .iter()
            .map(|s| (s.fact.key(), s.score))
            .collect();
        let similarity_scores: HashMap<FactKey, f32> = similarity_results
            .iter()
            .map(|s| (s.fact.key(), s.score))
            .collect();

        // Union in first-appearance order so equal combined scores stay
        // deterministic.
        let mut seen: Vec<FactKey> = Vec::new();
        let mut union: Vec<Fact> = Vec::new();
        for scored in keyword_results.iter().chain(similarity_results.iter()) {
            let key = scored.fact.key();
            if !seen.contains(&key) {
                seen.push(key);
                union.push(scored.fact.clone());
            }
        }

        let mut results: Vec<ScoredFact> = union
            .into_iter()
            .map(|fact| {
                let key = fact.key();
                let kw = keyword_scores.get(&key).copied().unwrap_or(0.0);
                let sim = similarity_scores.get(&key).copied().unwrap_or(0.0);
                let score = self.config.keyword_weight * kw + self.config.similarity_weight * sim;
                ScoredFact { fact, score }
            })
            .collect();

        sort_descending(&mut results);
        results.truncate(max_results);
        results
    }

    /// Facts mentioning an entity, scored by confidence.
    pub fn by_entity(&self, entity: &str, max_results: usize) -> Vec<ScoredFact> {
        let mut results: Vec<ScoredFact> = self
            .store
            .facts_about(entity)
            .into_iter()
            .map(|fact| ScoredFact {
                score: fact.confidence,
                fact,
            })
            .collect();

        sort_descending(&mut results);
        results.truncate(max_results);
        results
    }

    /// Facts carrying a relation, scored by confidence.
    pub fn by_relation(&self, relation: &str, max_results: usize) -> Vec<ScoredFact> {
        let mut results: Vec<ScoredFact> = self
            .store
            .facts_by_predicate(relation)
            .into_iter()
            .map(|fact| ScoredFact {
                score: fact.confidence,
                fact,
            })
            .collect();

        sort_descending(&mut results);
        results.truncate(max_results);
        results
    }

    /// Facts of one category. With a query they are keyword-scored against
    /// it; without, they keep insertion order and score by confidence.
    pub fn by_category(
        &self,
        category: FactCategory,
        query: Option<&str>,
        max_results: usize,
    ) -> Vec<ScoredFact> {
        let filtered = self
            .store
            .all_facts()
            .into_iter()
            .filter(|f| f.category == category);

        let mut results: Vec<ScoredFact> = match query {
            Some(query) => {
                let keywords = extract_keywords(query);
                let mut scored: Vec<ScoredFact> = filtered
                    .filter_map(|fact| {
                        let score = keyword_score(&fact, &keywords);
                        (score > 0.0).then_some(ScoredFact { fact, score })
                    })
                    .collect();
                sort_descending(&mut scored);
                scored
            }
            None => filtered
                .map(|fact| ScoredFact {
                    score: fact.confidence,
                    fact,
                })
                .collect(),
        };

        results.truncate(max_results);
        results
    }

    /// Contextual retrieval: the query extended with context strings, then
    /// handed to hybrid.
    pub fn contextual(&self, query: &str, context: &[String], max_results: usize) -> Vec<ScoredFact> {
        let extended = if context.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, context.join(" "))
        };
        self.hybrid(&extended, max_results)
    }

    /// Render results as a numbered list, optionally with scores.
    pub fn format_results(results: &[ScoredFact], include_scores: bool) -> String {
        if results.is_empty() {
            return "No relevant information found.".to_string();
        }

        results
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if include_scores {
                    format!(
                        "{}. {} {} {} (score: {:.3})",
                        i + 1,
                        s.fact.subject,
                        s.fact.predicate,
                        s.fact.object,
                        s.score
                    )
                } else {
                    format!(
                        "{}. {} {} {}",
                        i + 1,
                        s.fact.subject,
                        s.fact.predicate,
                        s.fact.object
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Engine diagnostics.
    pub fn stats(&self) -> RetrievalStats {
        let has_index = self
            .similarity_index()
            .map(|(_, index)| !index.is_empty())
            .unwrap_or(false);
        RetrievalStats {
            total_facts: self.store.len(),
            has_similarity_index: has_index,
            max_results: self.config.max_results,
            similarity_threshold: self.config.similarity_threshold,
        }
    }

    /// Fetch the cached similarity index, rebuilding when the store revision
    /// has moved since the last build. Returns `None` when the corpus yields
    /// no index.
    fn similarity_index(&self) -> Option<(Arc<Vec<Fact>>, Arc<TfidfIndex>)> {
        let revision = self.store.revision();
        let mut cache = self.cache.lock();

        let stale = cache.as_ref().is_none_or(|c| c.revision != revision);
        if stale {
            let facts = Arc::new(self.store.all_facts());
            let documents: Vec<String> = facts.iter().map(|f| f.text()).collect();
            let index = TfidfIndex::build(&documents).map(Arc::new);
            debug!(
                revision,
                facts = facts.len(),
                built = index.is_some(),
                "Rebuilt similarity index"
            );
            *cache = Some(IndexCache {
                revision,
                facts,
                index,
            });
        }

        let cached = cache.as_ref()?;
        let index = cached.index.as_ref()?;
        Some((cached.facts.clone(), index.clone()))
    }
}

/// Stable descending sort by score: equal scores keep their current order.
fn sort_descending(results: &mut [ScoredFact]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
