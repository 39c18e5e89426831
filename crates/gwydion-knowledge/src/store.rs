//! Indexed fact storage.
//!
//! [`FactStore`] holds normalized (subject, predicate, object) triples and
//! keeps three id-list indexes (by subject, object, and predicate) so that
//! entity and relation lookups never scan the full fact list. The store is
//! designed to be shared as `Arc<FactStore>`: all operations take `&self`
//! behind an internal non-poisoning mutex, and a monotonic revision counter
//! lets downstream consumers (the retrieval engine's similarity index) detect
//! mutations without holding a reference into the store.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gwydion_types::{Fact, FactCategory, normalize_entity, normalize_relation};

use crate::error::{KnowledgeError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot format
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate counts reported by [`FactStore::stats`] and embedded in
/// snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub num_facts: usize,
    pub num_entities: usize,
    pub num_relations: usize,
}

/// On-disk snapshot of a fact store.
#[derive(Debug, Serialize, Deserialize)]
struct FactSnapshot {
    facts: Vec<Fact>,
    entities: Vec<String>,
    relations: Vec<String>,
    stats: StoreStats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fact extraction patterns
// ─────────────────────────────────────────────────────────────────────────────

/// Surface patterns for pulling triples out of observation text. The
/// `requires` pattern swaps its captures: "you need X to Y" ⇒ (Y, requires, X).
static EXTRACTION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(\w+(?:\s+\w+)*)\s+is\s+in\s+(?:the\s+)?(\w+(?:\s+\w+)*)").unwrap(),
            "located_in",
        ),
        (
            Regex::new(r"(\w+(?:\s+\w+)*)\s+has\s+(?:a\s+|an\s+)?(\w+(?:\s+\w+)*)").unwrap(),
            "has",
        ),
        (
            Regex::new(r"(\w+(?:\s+\w+)*)\s+contains?\s+(?:a\s+|an\s+)?(\w+(?:\s+\w+)*)").unwrap(),
            "contains",
        ),
        (
            Regex::new(r"you\s+need\s+(?:a\s+|an\s+)?(\w+(?:\s+\w+)*)\s+to\s+(\w+(?:\s+\w+)*)")
                .unwrap(),
            "requires",
        ),
    ]
});

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StoreInner {
    /// Facts in insertion order. Indexes hold positions into this vec.
    facts: Vec<Fact>,
    by_subject: HashMap<String, Vec<usize>>,
    by_object: HashMap<String, Vec<usize>>,
    by_predicate: HashMap<String, Vec<usize>>,
    entities: BTreeSet<String>,
    relations: BTreeSet<String>,
    /// Bumped on every successful insert or reload.
    revision: u64,
}

impl StoreInner {
    fn contains(&self, fact: &Fact) -> bool {
        self.by_subject
            .get(&fact.subject)
            .is_some_and(|ids| {
                ids.iter().any(|&i| {
                    let existing = &self.facts[i];
                    existing.predicate == fact.predicate && existing.object == fact.object
                })
            })
    }

    fn insert(&mut self, fact: Fact) {
        let id = self.facts.len();
        self.by_subject
            .entry(fact.subject.clone())
            .or_default()
            .push(id);
        self.by_object
            .entry(fact.object.clone())
            .or_default()
            .push(id);
        self.by_predicate
            .entry(fact.predicate.clone())
            .or_default()
            .push(id);
        self.entities.insert(fact.subject.clone());
        self.entities.insert(fact.object.clone());
        self.relations.insert(fact.predicate.clone());
        self.facts.push(fact);
        self.revision += 1;
    }
}

/// In-process, single-writer fact store.
pub struct FactStore {
    inner: Mutex<StoreInner>,
}

impl FactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Add a fact with default confidence, source, and inferred category.
    ///
    /// Returns `Ok(Some(fact))` on insert and `Ok(None)` when the normalized
    /// triple is already present (the store is unchanged).
    pub fn add_fact(
        &self,
        subject: impl AsRef<str>,
        predicate: impl AsRef<str>,
        object: impl AsRef<str>,
    ) -> Result<Option<Fact>> {
        self.add_fact_full(subject, predicate, object, 1.0, "manual", None)
    }

    /// Add a fact with explicit metadata. A `None` category is inferred from
    /// the normalized subject and predicate.
    pub fn add_fact_full(
        &self,
        subject: impl AsRef<str>,
        predicate: impl AsRef<str>,
        object: impl AsRef<str>,
        confidence: f32,
        source: impl Into<String>,
        category: Option<FactCategory>,
    ) -> Result<Option<Fact>> {
        let mut fact = Fact::new(subject, predicate, object)
            .with_confidence(confidence)
            .with_source(source);
        if let Some(category) = category {
            fact = fact.with_category(category);
        }

        if fact.has_empty_component() {
            return Err(KnowledgeError::InvalidFact(format!(
                "empty component in {fact}"
            )));
        }

        let mut inner = self.inner.lock();
        if inner.contains(&fact) {
            debug!(%fact, "Fact already exists");
            return Ok(None);
        }

        debug!(%fact, category = %fact.category, "Added fact");
        inner.insert(fact.clone());
        Ok(Some(fact))
    }

    /// Extract facts from free text using simple surface patterns and add
    /// them with the given source. Returns the number of facts added.
    pub fn add_facts_from_text(&self, text: &str, source: &str) -> usize {
        let text = text.to_lowercase();
        let mut added = 0;

        for (pattern, relation) in EXTRACTION_PATTERNS.iter() {
            for caps in pattern.captures_iter(&text) {
                let (subject, object) = if *relation == "requires" {
                    (&caps[2], &caps[1])
                } else {
                    (&caps[1], &caps[2])
                };

                if let Ok(Some(_)) =
                    self.add_fact_full(subject, *relation, object, 1.0, source, None)
                {
                    added += 1;
                }
            }
        }

        info!(added, source, "Extracted facts from text");
        added
    }

    /// All facts where the entity appears as subject or object, in insertion
    /// order.
    pub fn facts_about(&self, entity: &str) -> Vec<Fact> {
        let entity = normalize_entity(entity);
        let inner = self.inner.lock();

        let mut ids: Vec<usize> = Vec::new();
        for index in [&inner.by_subject, &inner.by_object] {
            if let Some(found) = index.get(&entity) {
                ids.extend_from_slice(found);
            }
        }
        ids.sort_unstable();
        ids.dedup();

        ids.into_iter().map(|i| inner.facts[i].clone()).collect()
    }

    /// All facts carrying the given predicate, in insertion order.
    pub fn facts_by_predicate(&self, predicate: &str) -> Vec<Fact> {
        let predicate = normalize_relation(predicate);
        let inner = self.inner.lock();

        inner
            .by_predicate
            .get(&predicate)
            .map(|ids| ids.iter().map(|&i| inner.facts[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Entities reachable from `entity` via one outgoing edge, optionally
    /// restricted to a single relation.
    pub fn neighbors(&self, entity: &str, relation: Option<&str>) -> Vec<String> {
        let entity = normalize_entity(entity);
        let relation = relation.map(normalize_relation);
        let inner = self.inner.lock();

        let mut neighbors = Vec::new();
        if let Some(ids) = inner.by_subject.get(&entity) {
            for &i in ids {
                let fact = &inner.facts[i];
                if let Some(ref rel) = relation
                    && fact.predicate != *rel
                {
                    continue;
                }
                if !neighbors.contains(&fact.object) {
                    neighbors.push(fact.object.clone());
                }
            }
        }
        neighbors
    }

    /// Number of stored facts.
    pub fn len(&self) -> usize {
        self.inner.lock().facts.len()
    }

    /// True if the store holds no facts.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().facts.is_empty()
    }

    /// Monotonic mutation counter. Consumers cache derived indexes against
    /// this value and rebuild when it moves.
    pub fn revision(&self) -> u64 {
        self.inner.lock().revision
    }

    /// Clone of every stored fact, in insertion order.
    pub fn all_facts(&self) -> Vec<Fact> {
        self.inner.lock().facts.clone()
    }

    /// All known entity names, sorted.
    pub fn entities(&self) -> Vec<String> {
        self.inner.lock().entities.iter().cloned().collect()
    }

    /// All known relation names, sorted.
    pub fn relations(&self) -> Vec<String> {
        self.inner.lock().relations.iter().cloned().collect()
    }

    /// Aggregate counts.
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        StoreStats {
            num_facts: inner.facts.len(),
            num_entities: inner.entities.len(),
            num_relations: inner.relations.len(),
        }
    }

    /// Serialize the store to a JSON snapshot file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = {
            let inner = self.inner.lock();
            FactSnapshot {
                facts: inner.facts.clone(),
                entities: inner.entities.iter().cloned().collect(),
                relations: inner.relations.iter().cloned().collect(),
                stats: StoreStats {
                    num_facts: inner.facts.len(),
                    num_entities: inner.entities.len(),
                    num_relations: inner.relations.len(),
                },
            }
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;

        info!(path = %path.display(), facts = snapshot.stats.num_facts, "Saved fact snapshot");
        Ok(())
    }

    /// Replace the store contents from a JSON snapshot file.
    ///
    /// Stored categories are restored verbatim (not re-inferred). On any
    /// failure the in-memory state is left unchanged.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let snapshot: FactSnapshot = serde_json::from_str(&json)?;

        let mut rebuilt = StoreInner::default();
        for fact in snapshot.facts {
            if fact.has_empty_component() || rebuilt.contains(&fact) {
                continue;
            }
            rebuilt.insert(fact);
        }

        let loaded = rebuilt.facts.len();
        let mut inner = self.inner.lock();
        rebuilt.revision = inner.revision + 1;
        *inner = rebuilt;

        info!(path = %path.display(), facts = loaded, "Loaded fact snapshot");
        Ok(loaded)
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded_store() -> FactStore {
        let store = FactStore::new();
        store.add_fact("kitchen", "contains", "key").unwrap();
        store.add_fact("key", "opens", "chest").unwrap();
        store.add_fact("kitchen", "leads_to", "hallway").unwrap();
        store
    }

    #[test]
    fn test_add_fact_basic() {
        let store = FactStore::new();
        let fact = store.add_fact("Kitchen", "Contains", "Key").unwrap();
        assert!(fact.is_some());
        assert_eq!(store.len(), 1);

        let fact = fact.unwrap();
        assert_eq!(fact.subject, "kitchen");
        assert_eq!(fact.category, FactCategory::Condition);
    }

    #[test]
    fn test_add_fact_idempotent() {
        let store = FactStore::new();
        assert!(store.add_fact("kitchen", "contains", "key").unwrap().is_some());
        // Same triple, different surface form
        assert!(store.add_fact(" Kitchen", "CONTAINS", "key ").unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_fact_rejects_empty() {
        let store = FactStore::new();
        assert!(matches!(
            store.add_fact("", "contains", "key"),
            Err(KnowledgeError::InvalidFact(_))
        ));
        assert!(matches!(
            store.add_fact("kitchen", "   ", "key"),
            Err(KnowledgeError::InvalidFact(_))
        ));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_add_fact_full_explicit_category() {
        let store = FactStore::new();
        let fact = store
            .add_fact_full("kitchen", "contains", "key", 0.7, "seed", Some(FactCategory::Action))
            .unwrap()
            .unwrap();
        assert_eq!(fact.category, FactCategory::Action);
        assert_eq!(fact.source, "seed");
        assert!((fact.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_revision_moves_on_insert_only() {
        let store = FactStore::new();
        assert_eq!(store.revision(), 0);
        store.add_fact("a", "r", "b").unwrap();
        assert_eq!(store.revision(), 1);
        // Duplicate leaves the revision alone
        store.add_fact("a", "r", "b").unwrap();
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_facts_about_subject_and_object() {
        let store = seeded_store();
        let facts = store.facts_about("key");
        assert_eq!(facts.len(), 2);
        // Insertion order: (kitchen contains key) then (key opens chest)
        assert_eq!(facts[0].subject, "kitchen");
        assert_eq!(facts[1].subject, "key");
    }

    #[test]
    fn test_facts_by_predicate() {
        let store = seeded_store();
        let facts = store.facts_by_predicate("Leads To");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].object, "hallway");
    }

    #[test]
    fn test_neighbors() {
        let store = seeded_store();
        let all = store.neighbors("kitchen", None);
        assert_eq!(all, vec!["key".to_string(), "hallway".to_string()]);

        let via = store.neighbors("kitchen", Some("contains"));
        assert_eq!(via, vec!["key".to_string()]);

        assert!(store.neighbors("attic", None).is_empty());
    }

    #[test]
    fn test_add_facts_from_text() {
        let store = FactStore::new();
        let added = store.add_facts_from_text("The key is in the kitchen.", "observation");
        assert!(added >= 1);
        let facts = store.facts_by_predicate("located_in");
        assert!(facts.iter().any(|f| f.object == "kitchen"));
    }

    #[test]
    fn test_add_facts_from_text_requires_swaps_captures() {
        let store = FactStore::new();
        store.add_facts_from_text("you need a key to open", "observation");
        let facts = store.facts_by_predicate("requires");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].subject, "open");
        assert_eq!(facts[0].object, "key");
    }

    #[test]
    fn test_stats() {
        let store = seeded_store();
        let stats = store.stats();
        assert_eq!(stats.num_facts, 3);
        // kitchen, key, chest, hallway
        assert_eq!(stats.num_entities, 4);
        assert_eq!(stats.num_relations, 3);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = seeded_store();
        store
            .add_fact_full("goal", "requires", "chest", 0.5, "seed", None)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        store.save(&path).unwrap();

        let restored = FactStore::new();
        let loaded = restored.load(&path).unwrap();
        assert_eq!(loaded, 4);

        let before: HashSet<_> = store.all_facts().iter().map(|f| f.key()).collect();
        let after: HashSet<_> = restored.all_facts().iter().map(|f| f.key()).collect();
        assert_eq!(before, after);

        // Categories restored verbatim, including the inferred Outcome
        let goal_facts = restored.facts_about("goal");
        assert_eq!(goal_facts[0].category, FactCategory::Outcome);
    }

    #[test]
    fn test_load_missing_file_keeps_state() {
        let store = seeded_store();
        let result = store.load("/nonexistent/facts.json");
        assert!(matches!(result, Err(KnowledgeError::Persistence(_))));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_load_corrupt_snapshot_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = seeded_store();
        let result = store.load(&path);
        assert!(matches!(result, Err(KnowledgeError::Serialization(_))));
        assert_eq!(store.len(), 3);
    }
}
