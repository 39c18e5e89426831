//! Fact storage and graph management for Gwydion.
//!
//! This crate provides the two persistence-capable components of the core:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FactStore                                                  │
//! │  - Normalized (subject, predicate, object) triples          │
//! │  - Subject/object/predicate id-list indexes                 │
//! │  - Revision counter for lazy downstream index rebuilds      │
//! │  - JSON snapshot round trip                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────┐
//! │  GraphManager                                               │
//! │  - Labelled multigraph (nodes/edges with properties)        │
//! │  - Neighbor traversal, bounded simple-path search           │
//! │  - Versioned graph_v<N>.json snapshots                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fact store is shared by handle (`Arc<FactStore>`) and takes `&self`
//! everywhere; the graph manager is single-owner and takes `&mut self` for
//! mutation. Neither provides cross-process durability — persistence is
//! whole-state JSON snapshots, by design.
//!
//! # Usage
//!
//! ```no_run
//! use gwydion_knowledge::{FactStore, GraphManager, GraphNode, GraphEdge};
//!
//! let store = FactStore::new();
//! store.add_fact("kitchen", "contains", "key")?;
//! let facts = store.facts_about("key");
//!
//! let mut graph = GraphManager::open("data/kg")?;
//! graph.add_node(GraphNode::new("kitchen", "room"));
//! graph.add_edge(GraphEdge::new("kitchen", "hallway", "leads_to"));
//! graph.save(None)?;
//! # Ok::<(), gwydion_knowledge::KnowledgeError>(())
//! ```

pub mod error;
pub mod graph;
pub mod store;

pub use error::{KnowledgeError, Result};
pub use graph::{
    EdgeFilter, GraphEdge, GraphManager, GraphNode, GraphStats, NodeFilter, RelatedEntity,
};
pub use store::{FactStore, StoreStats};
