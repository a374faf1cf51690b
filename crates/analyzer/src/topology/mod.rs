//! Per-graph topology statistics
//!
//! Network-level summary (density, components, clustering, diameter) and
//! per-node metrics (degree, PageRank, closeness, betweenness) for one
//! co-authorship graph. Component structure and the diameter ignore edge
//! weights; the centrality measures use them.

mod centrality;
mod pagerank;

pub use centrality::{betweenness_centrality, closeness_centrality};
pub use pagerank::{PageRankConfig, PageRankScorer};

use plenum_common::graph::{CoauthorshipGraph, NodeId};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Network-level statistics for one period graph
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSummary {
    pub period: String,
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub connected_components: usize,
    pub largest_cc_rel_size: f64,
    pub global_clustering: f64,
    pub avg_clustering: f64,
    pub diameter: usize,
}

/// Per-node statistics for one period graph
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMetrics {
    pub degree: usize,
    pub weighted_degree: f64,
    pub pagerank: f64,
    pub closeness: f64,
    pub betweenness: f64,
}

/// Connected components as node sets, largest first
fn connected_components(graph: &CoauthorshipGraph) -> Vec<Vec<NodeId>> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut components = Vec::new();

    for start in graph.sorted_nodes() {
        if visited.contains(&start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for (neighbor, _) in graph.neighbors(node) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }

    components.sort_by_key(|component| std::cmp::Reverse(component.len()));
    components
}

/// Unweighted eccentricity of `start` within its component
fn bfs_eccentricity(graph: &CoauthorshipGraph, start: NodeId) -> usize {
    let mut depth: BTreeMap<NodeId, usize> = BTreeMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    let mut max_depth = 0;

    while let Some(node) = queue.pop_front() {
        let next = depth[&node] + 1;
        for (neighbor, _) in graph.neighbors(node) {
            if let std::collections::btree_map::Entry::Vacant(entry) = depth.entry(neighbor) {
                entry.insert(next);
                max_depth = max_depth.max(next);
                queue.push_back(neighbor);
            }
        }
    }

    max_depth
}

/// Unweighted diameter of the largest connected component
fn largest_component_diameter(graph: &CoauthorshipGraph, components: &[Vec<NodeId>]) -> usize {
    let Some(largest) = components.first() else {
        return 0;
    };
    largest
        .iter()
        .map(|&node| bfs_eccentricity(graph, node))
        .max()
        .unwrap_or(0)
}

/// Edges among the neighbors of `node`
fn links_among_neighbors(graph: &CoauthorshipGraph, node: NodeId) -> usize {
    let neighbors: Vec<NodeId> = graph.neighbors(node).map(|(neighbor, _)| neighbor).collect();
    let mut links = 0;
    for (i, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[i + 1..] {
            if graph.has_edge(a, b) {
                links += 1;
            }
        }
    }
    links
}

/// Global transitivity and average local clustering
fn clustering(graph: &CoauthorshipGraph) -> (f64, f64) {
    let n = graph.node_count();
    if n == 0 {
        return (0.0, 0.0);
    }

    let mut closed_triads = 0usize;
    let mut possible_triads = 0usize;
    let mut local_sum = 0.0;

    for node in graph.nodes() {
        let degree = graph.degree(node);
        if degree < 2 {
            continue;
        }
        let links = links_among_neighbors(graph, node);
        let pairs = degree * (degree - 1) / 2;
        closed_triads += links;
        possible_triads += pairs;
        local_sum += links as f64 / pairs as f64;
    }

    let global = if possible_triads > 0 {
        closed_triads as f64 / possible_triads as f64
    } else {
        0.0
    };
    (global, local_sum / n as f64)
}

/// Compute the network-level summary of a graph
pub fn summarize(graph: &CoauthorshipGraph) -> NetworkSummary {
    let nodes = graph.node_count();
    let edges = graph.edge_count();

    let density = if nodes > 1 {
        2.0 * edges as f64 / (nodes as f64 * (nodes - 1) as f64)
    } else {
        0.0
    };

    let components = connected_components(graph);
    let largest_cc_rel_size = components
        .first()
        .map(|component| component.len() as f64 / nodes as f64)
        .unwrap_or(0.0);
    let diameter = largest_component_diameter(graph, &components);
    let (global_clustering, avg_clustering) = clustering(graph);

    NetworkSummary {
        period: graph.name().to_string(),
        nodes,
        edges,
        density,
        connected_components: components.len(),
        largest_cc_rel_size,
        global_clustering,
        avg_clustering,
        diameter,
    }
}

/// Compute per-node metrics for every node of a graph
pub fn node_metrics(graph: &CoauthorshipGraph) -> BTreeMap<NodeId, NodeMetrics> {
    let pagerank = PageRankScorer::new(PageRankConfig::default()).compute(graph);
    let closeness = closeness_centrality(graph);
    let betweenness = betweenness_centrality(graph);

    graph
        .sorted_nodes()
        .into_iter()
        .map(|node| {
            let metrics = NodeMetrics {
                degree: graph.degree(node),
                weighted_degree: graph.weighted_degree(node),
                pagerank: pagerank.get(&node).copied().unwrap_or(0.0),
                closeness: closeness.get(&node).copied().unwrap_or(0.0),
                betweenness: betweenness.get(&node).copied().unwrap_or(0.0),
            };
            (node, metrics)
        })
        .collect()
}
