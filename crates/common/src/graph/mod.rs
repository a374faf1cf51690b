//! Co-authorship graph representation
//!
//! Provides the in-memory weighted graph the statistics engine runs on,
//! plus the JSON artifact format the builder writes and the analyzer loads.
//!
//! Graphs are undirected, edge-weighted and simple: self-loops and parallel
//! edges are rejected by construction, and again when loading artifacts.

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

/// Stable legislator identifier
pub type NodeId = u64;

/// In-memory co-authorship graph for one period
#[derive(Debug, Clone)]
pub struct CoauthorshipGraph {
    /// Period label ("2013", "56", ...)
    name: String,

    /// Adjacency map: node -> neighbor -> edge weight (stored symmetrically)
    adjacency: HashMap<NodeId, HashMap<NodeId, f64>>,

    /// Categorical features per node; a missing key means missing data
    features: HashMap<NodeId, BTreeMap<String, String>>,
}

impl CoauthorshipGraph {
    /// Create an empty graph for a period
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adjacency: HashMap::new(),
            features: HashMap::new(),
        }
    }

    /// Period label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a node without features (no-op if present)
    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
        self.features.entry(node).or_default();
    }

    /// Add a node carrying its feature map, replacing any previous features
    pub fn add_node_with_features(&mut self, node: NodeId, features: BTreeMap<String, String>) {
        self.adjacency.entry(node).or_default();
        self.features.insert(node, features);
    }

    /// Feature value of a node, if the node carries that feature
    pub fn feature(&self, node: NodeId, feature: &str) -> Option<&str> {
        self.features.get(&node)?.get(feature).map(String::as_str)
    }

    fn validate_edge(&self, source: NodeId, target: NodeId, weight: f64) -> Result<()> {
        if source == target {
            return Err(AppError::UnsupportedGraphKind {
                reason: format!("self-loop on node {}", source),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(AppError::UnsupportedGraphKind {
                reason: format!("invalid weight {} on edge {}-{}", weight, source, target),
            });
        }
        Ok(())
    }

    /// Insert an undirected edge, replacing the weight if the edge exists
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<()> {
        self.validate_edge(source, target, weight)?;
        self.add_node(source);
        self.add_node(target);
        self.adjacency.entry(source).or_default().insert(target, weight);
        self.adjacency.entry(target).or_default().insert(source, weight);
        Ok(())
    }

    /// Add to the weight of an undirected edge, creating it (and missing
    /// endpoints) on first occurrence
    pub fn increment_edge(&mut self, source: NodeId, target: NodeId, delta: f64) -> Result<()> {
        self.validate_edge(source, target, delta)?;
        self.add_node(source);
        self.add_node(target);
        *self
            .adjacency
            .entry(source)
            .or_default()
            .entry(target)
            .or_insert(0.0) += delta;
        *self
            .adjacency
            .entry(target)
            .or_default()
            .entry(source)
            .or_insert(0.0) += delta;
        Ok(())
    }

    /// Neighbors of a node with edge weights (empty for unknown nodes)
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flatten()
            .map(|(&neighbor, &weight)| (neighbor, weight))
    }

    /// Number of incident edges
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map(|n| n.len()).unwrap_or(0)
    }

    /// Sum of incident edge weights
    pub fn weighted_degree(&self, node: NodeId) -> f64 {
        self.adjacency
            .get(&node)
            .map(|n| n.values().sum())
            .unwrap_or(0.0)
    }

    /// Weight of the edge between two nodes, if present
    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        self.adjacency.get(&source)?.get(&target).copied()
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edge_weight(source, target).is_some()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        let endpoints: usize = self.adjacency.values().map(|n| n.len()).sum();
        endpoints / 2
    }

    /// All nodes, in arbitrary order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// All nodes in ascending id order (for deterministic iteration)
    pub fn sorted_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.adjacency.keys().copied().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Distinct non-missing values of a feature across all nodes
    pub fn feature_values(&self, feature: &str) -> BTreeSet<String> {
        self.features
            .values()
            .filter_map(|map| map.get(feature).cloned())
            .collect()
    }

    /// Nodes whose feature equals the given value, in ascending id order
    pub fn nodes_with(&self, feature: &str, value: &str) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .features
            .iter()
            .filter(|(_, map)| map.get(feature).map(String::as_str) == Some(value))
            .map(|(&node, _)| node)
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Subgraph induced by a node set; keeps the period label and the
    /// members' feature maps, drops edges leaving the set
    pub fn induced_subgraph(&self, members: &HashSet<NodeId>) -> CoauthorshipGraph {
        let mut subgraph = CoauthorshipGraph::new(self.name.clone());
        for &node in members {
            if !self.contains_node(node) {
                continue;
            }
            let features = self.features.get(&node).cloned().unwrap_or_default();
            subgraph.add_node_with_features(node, features);
        }
        for (&node, neighbors) in &self.adjacency {
            if !members.contains(&node) {
                continue;
            }
            for (&neighbor, &weight) in neighbors {
                if node < neighbor && members.contains(&neighbor) {
                    subgraph.adjacency.entry(node).or_default().insert(neighbor, weight);
                    subgraph.adjacency.entry(neighbor).or_default().insert(node, weight);
                }
            }
        }
        subgraph
    }

    /// A graph is a clique when every node pair is connected. The empty
    /// graph and a single node are trivial cliques.
    pub fn is_clique(&self) -> bool {
        let n = self.node_count();
        self.edge_count() == n * n.saturating_sub(1) / 2
    }

    /// Serialize this graph to a JSON artifact
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = GraphFile::from(self);
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a graph from a JSON artifact
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| AppError::GraphLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file: GraphFile = serde_json::from_str(&json).map_err(|e| AppError::GraphLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        CoauthorshipGraph::try_from(file)
    }
}

/// On-disk graph artifact (`<period>_network.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphFile {
    pub name: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

impl From<&CoauthorshipGraph> for GraphFile {
    fn from(graph: &CoauthorshipGraph) -> Self {
        let nodes = graph
            .sorted_nodes()
            .into_iter()
            .map(|id| GraphNode {
                id,
                features: graph.features.get(&id).cloned().unwrap_or_default(),
            })
            .collect();

        let mut edges: Vec<GraphEdge> = Vec::with_capacity(graph.edge_count());
        for (&source, neighbors) in &graph.adjacency {
            for (&target, &weight) in neighbors {
                if source < target {
                    edges.push(GraphEdge { source, target, weight });
                }
            }
        }
        edges.sort_unstable_by_key(|e| (e.source, e.target));

        GraphFile {
            name: graph.name.clone(),
            nodes,
            edges,
        }
    }
}

impl TryFrom<GraphFile> for CoauthorshipGraph {
    type Error = AppError;

    /// Validates simple-undirected shape: duplicate edges, self-loops,
    /// negative weights and unknown endpoints are rejected. Zero-weight
    /// edges are accepted (the algorithms guard their denominators).
    fn try_from(file: GraphFile) -> Result<Self> {
        let mut graph = CoauthorshipGraph::new(file.name);
        for node in file.nodes {
            if graph.contains_node(node.id) {
                return Err(AppError::UnsupportedGraphKind {
                    reason: format!("duplicate node {}", node.id),
                });
            }
            graph.add_node_with_features(node.id, node.features);
        }
        for edge in file.edges {
            if !graph.contains_node(edge.source) || !graph.contains_node(edge.target) {
                return Err(AppError::UnsupportedGraphKind {
                    reason: format!("edge {}-{} references an unknown node", edge.source, edge.target),
                });
            }
            if graph.has_edge(edge.source, edge.target) {
                return Err(AppError::UnsupportedGraphKind {
                    reason: format!("duplicate edge {}-{}", edge.source, edge.target),
                });
            }
            graph.add_edge(edge.source, edge.target, edge.weight)?;
        }
        Ok(graph)
    }
}
