//! Distance-based centrality measures
//!
//! Closeness and betweenness over shortest paths, with edge distance
//! 1/weight so that frequent co-authorship means a short hop. Zero-weight
//! edges carry no path at all.

use plenum_common::graph::{CoauthorshipGraph, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Min-heap entry ordered by distance, then node id for determinism
#[derive(Debug, PartialEq)]
struct HeapEntry {
    distance: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path distances from `source` to every reachable node
fn shortest_path_lengths(graph: &CoauthorshipGraph, source: NodeId) -> HashMap<NodeId, f64> {
    let mut distances: HashMap<NodeId, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry {
        distance: 0.0,
        node: source,
    });

    while let Some(HeapEntry { distance, node }) = heap.pop() {
        if distances.contains_key(&node) {
            continue;
        }
        distances.insert(node, distance);

        for (neighbor, weight) in graph.neighbors(node) {
            if weight <= 0.0 || distances.contains_key(&neighbor) {
                continue;
            }
            heap.push(HeapEntry {
                distance: distance + 1.0 / weight,
                node: neighbor,
            });
        }
    }

    distances
}

/// Closeness centrality with the Wasserman-Faust reach correction.
///
/// For a node reaching `r` of the `n` nodes over total distance `d`, the
/// score is `((r - 1) / (n - 1)) * ((r - 1) / d)`. Nodes reaching nothing
/// score zero.
pub fn closeness_centrality(graph: &CoauthorshipGraph) -> HashMap<NodeId, f64> {
    let n = graph.node_count();
    let mut scores = HashMap::with_capacity(n);

    for node in graph.nodes() {
        let distances = shortest_path_lengths(graph, node);
        let reached = distances.len();
        let total: f64 = distances.values().sum();

        let score = if n > 1 && reached > 1 && total > 0.0 {
            let r = (reached - 1) as f64;
            (r / (n - 1) as f64) * (r / total)
        } else {
            0.0
        };
        scores.insert(node, score);
    }

    scores
}

/// Single-source stage of Brandes' algorithm: nodes in non-decreasing
/// distance order, shortest-path predecessors, and path counts
fn brandes_single_source(
    graph: &CoauthorshipGraph,
    source: NodeId,
) -> (Vec<NodeId>, HashMap<NodeId, Vec<NodeId>>, HashMap<NodeId, f64>) {
    let distances = shortest_path_lengths(graph, source);

    let mut ordered: Vec<NodeId> = distances.keys().copied().collect();
    ordered.sort_by(|a, b| distances[a].total_cmp(&distances[b]).then_with(|| a.cmp(b)));

    let mut sigma: HashMap<NodeId, f64> = HashMap::with_capacity(ordered.len());
    let mut predecessors: HashMap<NodeId, Vec<NodeId>> = HashMap::with_capacity(ordered.len());
    sigma.insert(source, 1.0);

    for &node in &ordered {
        let node_sigma = sigma.get(&node).copied().unwrap_or(0.0);
        for (neighbor, weight) in graph.neighbors(node) {
            if weight <= 0.0 {
                continue;
            }
            let Some(&neighbor_distance) = distances.get(&neighbor) else {
                continue;
            };
            if neighbor_distance == distances[&node] + 1.0 / weight {
                *sigma.entry(neighbor).or_insert(0.0) += node_sigma;
                predecessors.entry(neighbor).or_default().push(node);
            }
        }
    }

    (ordered, predecessors, sigma)
}

/// Betweenness centrality over weighted shortest paths, normalized by
/// `1/((n - 1)(n - 2))`. Graphs with fewer than three nodes score all
/// zeros.
pub fn betweenness_centrality(graph: &CoauthorshipGraph) -> HashMap<NodeId, f64> {
    let n = graph.node_count();
    let mut scores: HashMap<NodeId, f64> = graph.nodes().map(|node| (node, 0.0)).collect();
    if n <= 2 {
        return scores;
    }

    for source in graph.sorted_nodes() {
        let (ordered, predecessors, sigma) = brandes_single_source(graph, source);

        let mut delta: HashMap<NodeId, f64> = HashMap::with_capacity(ordered.len());
        for &node in ordered.iter().rev() {
            let node_delta = delta.get(&node).copied().unwrap_or(0.0);
            if let Some(preds) = predecessors.get(&node) {
                for &pred in preds {
                    let share = sigma[&pred] / sigma[&node] * (1.0 + node_delta);
                    *delta.entry(pred).or_insert(0.0) += share;
                }
            }
            if node != source {
                *scores.entry(node).or_insert(0.0) += node_delta;
            }
        }
    }

    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    for score in scores.values_mut() {
        *score *= scale;
    }
    scores
}
