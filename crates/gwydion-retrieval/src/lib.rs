//! Multi-strategy fact retrieval for Gwydion.
//!
//! The [`RetrievalEngine`] answers queries over a shared
//! [`FactStore`](gwydion_knowledge::FactStore) using one of several
//! strategies, selected by [`QueryKind`](gwydion_types::QueryKind):
//!
//! | Strategy   | Scoring                                             |
//! |------------|-----------------------------------------------------|
//! | keywords   | positional keyword weights × fact confidence        |
//! | similarity | TF-IDF cosine (keyword fallback when unbuildable)   |
//! | hybrid     | 0.6 × keyword + 0.4 × similarity over the union     |
//! | entity     | subject/object index lookup, confidence-scored      |
//! | relation   | predicate index lookup, confidence-scored           |
//! | category   | one category, optionally keyword re-scored          |
//! | contextual | hybrid over the query extended with context         |
//!
//! All strategies are pure reads; `max_results` truncates only after full
//! ranking. The similarity index is rebuilt lazily against the store's
//! revision counter rather than on every insert.

pub mod cache;
pub mod engine;
pub mod keyword;
pub mod tfidf;

pub use cache::{DEFAULT_TTL, QueryCache};
pub use engine::{RetrievalConfig, RetrievalEngine, RetrievalStats, ScoredFact};
pub use keyword::{extract_keywords, keyword_score};
pub use tfidf::TfidfIndex;
