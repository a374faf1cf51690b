//! Weighted PageRank over the co-authorship graph
//!
//! Power iteration where each node spreads its score across neighbors in
//! proportion to edge weight. Scores form a probability distribution.

use plenum_common::graph::{CoauthorshipGraph, NodeId};
use std::collections::HashMap;

/// PageRank configuration
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (typically 0.85)
    pub damping: f64,

    /// Maximum iterations
    pub max_iterations: usize,

    /// Convergence threshold
    pub epsilon: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            epsilon: 1e-6,
        }
    }
}

/// Weighted PageRank scorer
pub struct PageRankScorer {
    config: PageRankConfig,
}

impl PageRankScorer {
    /// Create a new scorer
    pub fn new(config: PageRankConfig) -> Self {
        Self { config }
    }

    /// Compute PageRank scores for all nodes
    pub fn compute(&self, graph: &CoauthorshipGraph) -> HashMap<NodeId, f64> {
        let n = graph.node_count();
        if n == 0 {
            return HashMap::new();
        }

        let n_f64 = n as f64;
        let initial_score = 1.0 / n_f64;
        let damping = self.config.damping;
        let teleport = (1.0 - damping) / n_f64;

        let nodes: Vec<NodeId> = graph.sorted_nodes();
        let mut scores: HashMap<NodeId, f64> =
            nodes.iter().map(|&id| (id, initial_score)).collect();

        // Total outgoing weight per node; zero marks a dangling node
        let out_weights: HashMap<NodeId, f64> = nodes
            .iter()
            .map(|&id| (id, graph.weighted_degree(id)))
            .collect();

        for _ in 0..self.config.max_iterations {
            let mut new_scores: HashMap<NodeId, f64> = HashMap::with_capacity(n);
            let mut max_diff: f64 = 0.0;

            // Isolated nodes spread their score uniformly over the graph
            let dangling_sum: f64 = nodes
                .iter()
                .filter(|&&id| out_weights[&id] == 0.0)
                .map(|id| scores[id])
                .sum();
            let dangling_share = damping * dangling_sum / n_f64;

            for &node in &nodes {
                let neighbor_sum: f64 = graph
                    .neighbors(node)
                    .map(|(neighbor, weight)| {
                        let out = out_weights[&neighbor];
                        if out > 0.0 {
                            scores[&neighbor] * weight / out
                        } else {
                            0.0
                        }
                    })
                    .sum();

                let new_score = teleport + dangling_share + damping * neighbor_sum;

                let old_score = scores[&node];
                max_diff = max_diff.max((new_score - old_score).abs());

                new_scores.insert(node, new_score);
            }

            scores = new_scores;

            if max_diff < self.config.epsilon {
                break;
            }
        }

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pagerank_empty_graph() {
        let graph = CoauthorshipGraph::new("empty");
        let scorer = PageRankScorer::new(PageRankConfig::default());
        assert!(scorer.compute(&graph).is_empty());
    }

    #[test]
    fn test_pagerank_sums_to_one() {
        let mut graph = CoauthorshipGraph::new("t");
        graph.add_edge(1, 2, 3.0).unwrap();
        graph.add_edge(2, 3, 1.0).unwrap();
        graph.add_edge(3, 4, 2.0).unwrap();
        graph.add_node(5);

        let scorer = PageRankScorer::new(PageRankConfig::default());
        let scores = scorer.compute(&graph);

        let total: f64 = scores.values().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pagerank_uniform_on_clique() {
        let mut graph = CoauthorshipGraph::new("t");
        graph.add_edge(1, 2, 1.0).unwrap();
        graph.add_edge(2, 3, 1.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();

        let scorer = PageRankScorer::new(PageRankConfig::default());
        let scores = scorer.compute(&graph);

        for score in scores.values() {
            assert_relative_eq!(*score, 1.0 / 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_pagerank_favors_heavy_edges() {
        // hub 1 splits its score 9:1 between nodes 2 and 3
        let mut graph = CoauthorshipGraph::new("t");
        graph.add_edge(1, 2, 9.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();

        let scorer = PageRankScorer::new(PageRankConfig::default());
        let scores = scorer.compute(&graph);

        assert!(scores[&2] > scores[&3], "heavily linked node should rank higher");
        assert!(scores[&1] > scores[&2], "hub gathers both streams");
    }
}
