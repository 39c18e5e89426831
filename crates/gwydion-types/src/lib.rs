//! Shared types for the Gwydion agent system.
//!
//! This crate defines the data model that the knowledge store, retrieval
//! engine, and reasoning controller exchange:
//!
//! - [`Fact`]: a normalized (subject, predicate, object) triple with
//!   confidence, source, and a reasoning-role [`FactCategory`]
//! - [`QueryKind`]: the retrieval strategies a caller (or an LLM, via the
//!   textual `query_kg` contract) can request

pub mod fact;
pub mod query;

pub use fact::{Fact, FactCategory, FactKey, normalize_entity, normalize_relation};
pub use query::{QueryKind, UnknownQueryKind};
