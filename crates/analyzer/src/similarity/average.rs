//! Node average-similarity calculator

use super::algos::{SimilarityAlgorithm, SimilarityScorer};
use plenum_common::graph::{CoauthorshipGraph, NodeId};
use std::collections::HashMap;

/// Average similarity per node over all unordered node pairs of a graph.
///
/// A clique short-circuits to 1.0 for every node (a single node is a
/// trivial clique). Otherwise each nonzero pair score is credited to both
/// endpoints and averaged over the pairs that contributed; nodes with no
/// nonzero pair are absent from the result, which is "no measurable
/// similarity" rather than zero.
pub fn average_similarity(
    graph: &CoauthorshipGraph,
    algorithm: SimilarityAlgorithm,
) -> HashMap<NodeId, f64> {
    if graph.node_count() == 0 {
        return HashMap::new();
    }
    if graph.is_clique() {
        return graph.nodes().map(|node| (node, 1.0)).collect();
    }

    let scorer = SimilarityScorer::new(graph, algorithm);
    let nodes = graph.sorted_nodes();

    let mut sums: HashMap<NodeId, f64> = HashMap::new();
    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    for (i, &u) in nodes.iter().enumerate() {
        for &v in &nodes[i + 1..] {
            let score = scorer.score(u, v);
            if score != 0.0 {
                *sums.entry(u).or_insert(0.0) += score;
                *sums.entry(v).or_insert(0.0) += score;
                *counts.entry(u).or_insert(0) += 1;
                *counts.entry(v).or_insert(0) += 1;
            }
        }
    }

    sums.into_iter()
        .map(|(node, sum)| {
            let count = counts.get(&node).copied().unwrap_or(1);
            (node, sum / count as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clique_short_circuit_all_algorithms() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 3.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(1, 3, 2.0).unwrap();

        for algorithm in SimilarityAlgorithm::all() {
            let avg = average_similarity(&g, algorithm);
            assert_eq!(avg.len(), 3);
            for node in [1, 2, 3] {
                assert_relative_eq!(avg[&node], 1.0);
            }
        }
    }

    #[test]
    fn test_single_node_is_trivial_clique() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_node(42);
        let avg = average_similarity(&g, SimilarityAlgorithm::Jaccard);
        assert_relative_eq!(avg[&42], 1.0);
    }

    #[test]
    fn test_empty_graph() {
        let g = CoauthorshipGraph::new("t");
        assert!(average_similarity(&g, SimilarityAlgorithm::Jaccard).is_empty());
    }

    #[test]
    fn test_star_center_absent() {
        // leaves pairwise share the center; the center shares nothing
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(0, 2, 1.0).unwrap();
        g.add_edge(0, 3, 1.0).unwrap();

        let avg = average_similarity(&g, SimilarityAlgorithm::Jaccard);
        assert!(!avg.contains_key(&0));
        for leaf in [1, 2, 3] {
            assert_relative_eq!(avg[&leaf], 1.0);
        }
    }

    #[test]
    fn test_isolated_node_absent() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_node(9);

        let avg = average_similarity(&g, SimilarityAlgorithm::Jaccard);
        assert!(!avg.contains_key(&9));
        assert!(avg.contains_key(&1));
    }

    #[test]
    fn test_paw_graph_averages() {
        // triangle 1-2-3 with pendant 4 on 3
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(1, 3, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();

        let avg = average_similarity(&g, SimilarityAlgorithm::Jaccard);
        // pairs: (1,2)=1/3 (1,3)=1/4 (1,4)=1/2 (2,3)=1/4 (2,4)=1/2 (3,4)=0
        assert_relative_eq!(avg[&1], 13.0 / 36.0);
        assert_relative_eq!(avg[&2], 13.0 / 36.0);
        assert_relative_eq!(avg[&3], 0.25);
        assert_relative_eq!(avg[&4], 0.5);
    }

    #[test]
    fn test_path_under_jaccard() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();

        let avg = average_similarity(&g, SimilarityAlgorithm::Jaccard);
        // only (1,3) and (2,4) score, at 0.5 each
        for node in [1, 2, 3, 4] {
            assert_relative_eq!(avg[&node], 0.5);
        }
    }
}
