//! Labelled multigraph with versioned snapshots.
//!
//! [`GraphManager`] is a general node/edge backend, independent of the fact
//! store: nodes carry a type and free-form properties, edges carry a relation,
//! properties, and a confidence. Several edges may connect the same pair of
//! nodes as long as their relations differ. Persistence is a sequence of
//! immutable, monotonically numbered JSON snapshot files
//! (`graph_v<version>.json`); loading restores the numerically highest one.
//!
//! The manager is owned exclusively by one writer: mutators take `&mut self`
//! and there is no internal locking.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{KnowledgeError, Result};

/// Paths returned by a single [`GraphManager::find_path`] call are capped at
/// this many.
const MAX_PATHS: usize = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// A node in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub properties: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GraphNode {
    /// Create a new node.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            node_type: node_type.into(),
            properties: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a property to the node.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// An edge in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub properties: HashMap<String, serde_json::Value>,
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GraphEdge {
    /// Create a new edge with confidence 1.0.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            properties: HashMap::new(),
            confidence: 1.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a property to the edge.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the confidence, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    fn key(&self) -> EdgeKey {
        (
            self.source.clone(),
            self.target.clone(),
            self.relation.clone(),
        )
    }
}

type EdgeKey = (String, String, String);

/// Node selection criteria for [`GraphManager::query_nodes`].
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    node_type: Option<String>,
    properties: Vec<(String, serde_json::Value)>,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact node type.
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Require a property to hold an exact value.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    fn matches(&self, node: &GraphNode) -> bool {
        if let Some(ref t) = self.node_type
            && node.node_type != *t
        {
            return false;
        }
        self.properties
            .iter()
            .all(|(k, v)| node.properties.get(k) == Some(v))
    }
}

/// Edge selection criteria for [`GraphManager::query_edges`].
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    relation: Option<String>,
    source: Option<String>,
    target: Option<String>,
    properties: Vec<(String, serde_json::Value)>,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    fn matches(&self, edge: &GraphEdge) -> bool {
        if let Some(ref r) = self.relation
            && edge.relation != *r
        {
            return false;
        }
        if let Some(ref s) = self.source
            && edge.source != *s
        {
            return false;
        }
        if let Some(ref t) = self.target
            && edge.target != *t
        {
            return false;
        }
        self.properties
            .iter()
            .all(|(k, v)| edge.properties.get(k) == Some(v))
    }
}

/// An entity found by [`GraphManager::related_entities`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub id: String,
    pub node_type: String,
    pub depth: usize,
}

/// Structural statistics over the whole graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub num_nodes: usize,
    pub num_edges: usize,
    /// Directed density: m / n(n−1), zero for fewer than two nodes.
    pub density: f64,
    /// Weak connectivity (edge direction ignored).
    pub is_connected: bool,
    pub num_components: usize,
}

/// On-disk snapshot of a graph version.
#[derive(Debug, Serialize, Deserialize)]
struct GraphSnapshot {
    version: u64,
    /// Unix timestamp in seconds.
    timestamp: f64,
    nodes: BTreeMap<String, GraphNode>,
    /// Keyed `"source-target-relation"`.
    edges: BTreeMap<String, GraphEdge>,
    statistics: GraphStats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Versioned node/edge store with traversal and path queries.
pub struct GraphManager {
    nodes: HashMap<String, GraphNode>,
    edges: BTreeMap<EdgeKey, GraphEdge>,
    storage_path: Option<PathBuf>,
    current_version: u64,
}

impl GraphManager {
    /// Create an empty, in-memory manager with no snapshot directory.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: BTreeMap::new(),
            storage_path: None,
            current_version: 0,
        }
    }

    /// Open a manager backed by a snapshot directory, restoring the highest
    /// existing version (a fresh graph when none exists).
    pub fn open(storage_path: impl AsRef<Path>) -> Result<Self> {
        let storage_path = storage_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_path)?;

        let mut manager = Self::new();
        manager.storage_path = Some(storage_path);
        manager.load_latest()?;
        Ok(manager)
    }

    /// Insert or replace a node. Replacement keeps the original creation time
    /// and bumps the update time.
    pub fn add_node(&mut self, mut node: GraphNode) {
        if let Some(existing) = self.nodes.get(&node.id) {
            node.created_at = existing.created_at;
            node.updated_at = Utc::now();
        }
        debug!(id = %node.id, node_type = %node.node_type, "Added node");
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert or replace an edge. Missing endpoint nodes are auto-created as
    /// `"entity"` nodes so every edge endpoint is addressable.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                let node = GraphNode::new(endpoint.clone(), "entity")
                    .with_property("name", endpoint.clone());
                self.nodes.insert(endpoint.clone(), node);
            }
        }
        debug!(source = %edge.source, target = %edge.target, relation = %edge.relation, "Added edge");
        self.edges.insert(edge.key(), edge);
    }

    /// Add a knowledge triple: entity nodes for both ends plus a connecting
    /// edge annotated with its source and insertion time.
    pub fn add_triple(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        confidence: f32,
        source: &str,
    ) {
        let subject = subject.into();
        let object = object.into();

        for id in [&subject, &object] {
            if !self.nodes.contains_key(id.as_str()) {
                self.add_node(GraphNode::new(id.clone(), "entity").with_property("name", id.clone()));
            }
        }

        let edge = GraphEdge::new(subject, object, predicate)
            .with_confidence(confidence)
            .with_property("source", source)
            .with_property("timestamp", unix_timestamp());
        self.add_edge(edge);
    }

    /// Look up a node by id.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Nodes adjacent to `id` in either direction, optionally restricted to
    /// one relation. Each neighbor appears once.
    pub fn neighbors(&self, id: &str, relation: Option<&str>) -> Vec<String> {
        let mut neighbors = Vec::new();
        for edge in self.edges.values() {
            if let Some(rel) = relation
                && edge.relation != rel
            {
                continue;
            }
            let other = if edge.source == id {
                &edge.target
            } else if edge.target == id {
                &edge.source
            } else {
                continue;
            };
            if !neighbors.contains(other) {
                neighbors.push(other.clone());
            }
        }
        neighbors
    }

    /// Nodes matching the filter.
    pub fn query_nodes(&self, filter: &NodeFilter) -> Vec<&GraphNode> {
        self.nodes.values().filter(|n| filter.matches(n)).collect()
    }

    /// Edges matching the filter, in key order.
    pub fn query_edges(&self, filter: &EdgeFilter) -> Vec<&GraphEdge> {
        self.edges.values().filter(|e| filter.matches(e)).collect()
    }

    /// Delete a node and every edge touching it. Returns false when the node
    /// was not present.
    pub fn delete_node(&mut self, id: &str) -> bool {
        if self.nodes.remove(id).is_none() {
            return false;
        }
        self.edges
            .retain(|_, edge| edge.source != id && edge.target != id);
        debug!(id, "Deleted node and incident edges");
        true
    }

    /// Delete one edge. Returns false when no such edge exists.
    pub fn delete_edge(&mut self, source: &str, target: &str, relation: &str) -> bool {
        self.edges
            .remove(&(source.to_string(), target.to_string(), relation.to_string()))
            .is_some()
    }

    /// Find up to ten simple paths from `source` to `target` with at most
    /// `max_length` edges, by breadth-first expansion. A node already on the
    /// current path is never revisited, so no returned path contains a cycle.
    pub fn find_path(&self, source: &str, target: &str, max_length: usize) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        if !self.nodes.contains_key(source) {
            return paths;
        }

        let mut queue: VecDeque<(String, Vec<String>)> = VecDeque::new();
        queue.push_back((source.to_string(), vec![source.to_string()]));

        while let Some((current, path)) = queue.pop_front() {
            if paths.len() >= MAX_PATHS {
                break;
            }

            if current == target && path.len() > 1 {
                paths.push(path);
                continue;
            }

            // Expanding a path that already has max_length edges would
            // overrun the budget.
            if path.len() > max_length {
                continue;
            }

            for neighbor in self.neighbors(&current, None) {
                if !path.contains(&neighbor) {
                    let mut next = path.clone();
                    next.push(neighbor.clone());
                    queue.push_back((neighbor, next));
                }
            }
        }

        paths
    }

    /// Entities within `max_depth` hops of `entity`, found breadth-first.
    /// The query entity itself is not included.
    pub fn related_entities(&self, entity: &str, max_depth: usize) -> Vec<RelatedEntity> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut related = Vec::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((entity.to_string(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if visited.contains(&current) || depth > max_depth {
                continue;
            }
            visited.insert(current.clone());

            if depth > 0
                && let Some(node) = self.nodes.get(&current)
            {
                related.push(RelatedEntity {
                    id: current.clone(),
                    node_type: node.node_type.clone(),
                    depth,
                });
            }

            for neighbor in self.neighbors(&current, None) {
                if !visited.contains(&neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        related
    }

    /// Structural statistics for the current graph.
    pub fn statistics(&self) -> GraphStats {
        let n = self.nodes.len();
        let m = self.edges.len();

        let density = if n < 2 {
            0.0
        } else {
            m as f64 / (n as f64 * (n as f64 - 1.0))
        };

        let num_components = self.count_components();

        GraphStats {
            num_nodes: n,
            num_edges: m,
            density,
            is_connected: n > 0 && num_components == 1,
            num_components,
        }
    }

    /// Count weakly connected components (edge direction ignored).
    fn count_components(&self) -> usize {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut components = 0;

        for id in self.nodes.keys() {
            if visited.contains(id.as_str()) {
                continue;
            }
            components += 1;

            let mut queue: VecDeque<&str> = VecDeque::new();
            queue.push_back(id);
            visited.insert(id);

            while let Some(current) = queue.pop_front() {
                for edge in self.edges.values() {
                    let other = if edge.source == current {
                        edge.target.as_str()
                    } else if edge.target == current {
                        edge.source.as_str()
                    } else {
                        continue;
                    };
                    if !visited.contains(other)
                        && let Some((key, _)) = self.nodes.get_key_value(other)
                    {
                        visited.insert(key);
                        queue.push_back(key);
                    }
                }
            }
        }

        components
    }

    /// Current snapshot version (zero before any save or load).
    pub fn version(&self) -> u64 {
        self.current_version
    }

    /// Serialize the graph to a new immutable snapshot file and return its
    /// version. With no explicit version, the next number after the current
    /// one is used. In-memory state is unchanged on failure.
    pub fn save(&mut self, version: Option<u64>) -> Result<u64> {
        let storage = self.storage_path.clone().ok_or(KnowledgeError::NoStorage)?;
        let version = version.unwrap_or(self.current_version + 1);

        let snapshot = GraphSnapshot {
            version,
            timestamp: unix_timestamp(),
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.clone()))
                .collect(),
            edges: self
                .edges
                .values()
                .map(|edge| {
                    (
                        format!("{}-{}-{}", edge.source, edge.target, edge.relation),
                        edge.clone(),
                    )
                })
                .collect(),
            statistics: self.statistics(),
        };

        let path = storage.join(format!("graph_v{version}.json"));
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&path, json)?;

        self.current_version = version;
        info!(version, path = %path.display(), "Graph saved");
        Ok(version)
    }

    /// Restore the numerically highest snapshot in the storage directory.
    /// Returns false (leaving a fresh graph) when no snapshot exists.
    pub fn load_latest(&mut self) -> Result<bool> {
        let Some(storage) = self.storage_path.clone() else {
            return Err(KnowledgeError::NoStorage);
        };

        let mut latest: Option<(u64, PathBuf)> = None;
        for entry in std::fs::read_dir(&storage)? {
            let path = entry?.path();
            let Some(version) = snapshot_version(&path) else {
                continue;
            };
            if latest.as_ref().is_none_or(|(v, _)| version > *v) {
                latest = Some((version, path));
            }
        }

        let Some((version, path)) = latest else {
            info!(path = %storage.display(), "No existing graph snapshot, starting fresh");
            return Ok(false);
        };

        let json = std::fs::read_to_string(&path)?;
        let snapshot: GraphSnapshot = serde_json::from_str(&json)?;

        self.nodes = snapshot.nodes.into_iter().collect();
        self.edges = snapshot
            .edges
            .into_values()
            .map(|edge| (edge.key(), edge))
            .collect();
        self.current_version = version;

        info!(version, nodes = self.nodes.len(), edges = self.edges.len(), "Graph loaded");
        Ok(true)
    }
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Seconds since the Unix epoch, with sub-second precision.
fn unix_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Parse the version number out of a `graph_v<N>.json` file name.
fn snapshot_version(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_prefix("graph_v")?.strip_suffix(".json")?;
    match stem.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(file = name, "Ignoring snapshot file with unparseable version");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn room_graph() -> GraphManager {
        let mut g = GraphManager::new();
        g.add_node(GraphNode::new("kitchen", "room"));
        g.add_node(GraphNode::new("hallway", "room"));
        g.add_node(GraphNode::new("cellar", "room"));
        g.add_node(GraphNode::new("key", "item").with_property("portable", true));
        g.add_edge(GraphEdge::new("kitchen", "hallway", "leads_to"));
        g.add_edge(GraphEdge::new("hallway", "cellar", "leads_to"));
        g.add_edge(GraphEdge::new("kitchen", "key", "contains"));
        g
    }

    #[test]
    fn test_add_and_get_node() {
        let g = room_graph();
        let node = g.get_node("key").unwrap();
        assert_eq!(node.node_type, "item");
        assert_eq!(node.properties.get("portable"), Some(&serde_json::json!(true)));
        assert!(g.get_node("attic").is_none());
    }

    #[test]
    fn test_replace_node_keeps_created_at() {
        let mut g = GraphManager::new();
        g.add_node(GraphNode::new("a", "room"));
        let created = g.get_node("a").unwrap().created_at;
        g.add_node(GraphNode::new("a", "corridor"));
        let node = g.get_node("a").unwrap();
        assert_eq!(node.node_type, "corridor");
        assert_eq!(node.created_at, created);
    }

    #[test]
    fn test_add_edge_autocreates_endpoints() {
        let mut g = GraphManager::new();
        g.add_edge(GraphEdge::new("a", "b", "linked"));
        assert_eq!(g.get_node("a").unwrap().node_type, "entity");
        assert_eq!(g.get_node("b").unwrap().node_type, "entity");
    }

    #[test]
    fn test_multigraph_edges() {
        let mut g = room_graph();
        g.add_edge(GraphEdge::new("kitchen", "hallway", "adjacent_to"));
        let edges = g.query_edges(
            &EdgeFilter::new().with_source("kitchen").with_target("hallway"),
        );
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_neighbors_both_directions() {
        let g = room_graph();
        let mut n = g.neighbors("hallway", None);
        n.sort();
        assert_eq!(n, vec!["cellar".to_string(), "kitchen".to_string()]);

        let via = g.neighbors("kitchen", Some("contains"));
        assert_eq!(via, vec!["key".to_string()]);
    }

    #[test]
    fn test_query_nodes() {
        let g = room_graph();
        let rooms = g.query_nodes(&NodeFilter::new().with_type("room"));
        assert_eq!(rooms.len(), 3);

        let portable = g.query_nodes(&NodeFilter::new().with_property("portable", true));
        assert_eq!(portable.len(), 1);
        assert_eq!(portable[0].id, "key");
    }

    #[test]
    fn test_delete_node_cascades() {
        let mut g = room_graph();
        assert!(g.delete_node("hallway"));
        assert!(g.get_node("hallway").is_none());

        // Both hallway edges are gone, the kitchen-key edge survives
        assert!(g.query_edges(&EdgeFilter::new().with_relation("leads_to")).is_empty());
        assert_eq!(g.query_edges(&EdgeFilter::new().with_relation("contains")).len(), 1);

        assert!(!g.delete_node("hallway"));
    }

    #[test]
    fn test_delete_edge() {
        let mut g = room_graph();
        assert!(g.delete_edge("kitchen", "hallway", "leads_to"));
        assert!(!g.delete_edge("kitchen", "hallway", "leads_to"));
        assert_eq!(g.statistics().num_edges, 2);
    }

    #[test]
    fn test_find_path_simple() {
        let g = room_graph();
        let paths = g.find_path("kitchen", "cellar", 5);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], vec!["kitchen", "hallway", "cellar"]);
    }

    #[test]
    fn test_find_path_respects_max_length() {
        let g = room_graph();
        // kitchen → hallway → cellar needs 2 edges
        assert!(g.find_path("kitchen", "cellar", 1).is_empty());
        assert_eq!(g.find_path("kitchen", "cellar", 2).len(), 1);
    }

    #[test]
    fn test_find_path_no_repeated_nodes() {
        let mut g = room_graph();
        // Add a cycle
        g.add_edge(GraphEdge::new("cellar", "kitchen", "leads_to"));
        for path in g.find_path("kitchen", "cellar", 6) {
            let unique: HashSet<&String> = path.iter().collect();
            assert_eq!(unique.len(), path.len(), "cycle in path {path:?}");
            assert!(path.len() <= 7);
        }
    }

    #[test]
    fn test_find_path_missing_source() {
        let g = room_graph();
        assert!(g.find_path("attic", "cellar", 5).is_empty());
    }

    #[test]
    fn test_related_entities_depth() {
        let g = room_graph();
        let related = g.related_entities("kitchen", 1);
        let ids: HashSet<_> = related.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["hallway", "key"]));
        assert!(related.iter().all(|r| r.depth == 1));

        let deeper = g.related_entities("kitchen", 2);
        assert!(deeper.iter().any(|r| r.id == "cellar" && r.depth == 2));
    }

    #[test]
    fn test_statistics() {
        let g = room_graph();
        let stats = g.statistics();
        assert_eq!(stats.num_nodes, 4);
        assert_eq!(stats.num_edges, 3);
        assert!(stats.is_connected);
        assert_eq!(stats.num_components, 1);
        let expected = 3.0 / (4.0 * 3.0);
        assert!((stats.density - expected).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_components() {
        let mut g = room_graph();
        g.add_node(GraphNode::new("island", "room"));
        let stats = g.statistics();
        assert!(!stats.is_connected);
        assert_eq!(stats.num_components, 2);
    }

    #[test]
    fn test_add_triple() {
        let mut g = GraphManager::new();
        g.add_triple("key", "opens", "chest", 0.9, "seed");
        assert_eq!(g.get_node("key").unwrap().node_type, "entity");
        let edges = g.query_edges(&EdgeFilter::new().with_relation("opens"));
        assert_eq!(edges.len(), 1);
        assert!((edges[0].confidence - 0.9).abs() < f32::EPSILON);
        assert_eq!(
            edges[0].properties.get("source"),
            Some(&serde_json::json!("seed"))
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut g = GraphManager::open(dir.path()).unwrap();
        g.add_node(GraphNode::new("kitchen", "room"));
        g.add_node(GraphNode::new("key", "item"));
        g.add_edge(GraphEdge::new("kitchen", "key", "contains"));
        let v1 = g.save(None).unwrap();
        assert_eq!(v1, 1);

        g.add_node(GraphNode::new("chest", "item"));
        let v2 = g.save(None).unwrap();
        assert_eq!(v2, 2);

        let restored = GraphManager::open(dir.path()).unwrap();
        assert_eq!(restored.version(), 2);
        assert_eq!(restored.statistics().num_nodes, 3);
        assert_eq!(restored.statistics().num_edges, 1);
        assert!(restored.get_node("chest").is_some());
    }

    #[test]
    fn test_load_latest_picks_highest_version() {
        let dir = tempfile::tempdir().unwrap();

        let mut g = GraphManager::open(dir.path()).unwrap();
        g.add_node(GraphNode::new("a", "room"));
        // Write versions out of lexicographic order: v9 sorts after v10
        g.save(Some(9)).unwrap();
        g.add_node(GraphNode::new("b", "room"));
        g.save(Some(10)).unwrap();

        let restored = GraphManager::open(dir.path()).unwrap();
        assert_eq!(restored.version(), 10);
        assert_eq!(restored.statistics().num_nodes, 2);
    }

    #[test]
    fn test_open_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let g = GraphManager::open(dir.path().join("kg")).unwrap();
        assert_eq!(g.version(), 0);
        assert_eq!(g.statistics().num_nodes, 0);
    }

    #[test]
    fn test_save_without_storage_fails() {
        let mut g = GraphManager::new();
        assert!(matches!(g.save(None), Err(KnowledgeError::NoStorage)));
    }

    #[test]
    fn test_load_corrupt_snapshot_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("graph_v3.json"), "{broken").unwrap();
        assert!(GraphManager::open(dir.path()).is_err());
    }
}
