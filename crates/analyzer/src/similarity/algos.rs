//! Similarity algorithm library
//!
//! Four pairwise similarity coefficients over the co-authorship graph, in
//! plain and edge-weighted forms. The Adamic-Adar variants precompute a
//! `1/ln(degree)` table per graph before pair scoring; nodes with degree
//! below 2 are left out of the table on purpose, so they never contribute
//! as common neighbors.

use plenum_common::errors::AppError;
use plenum_common::graph::{CoauthorshipGraph, NodeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Supported similarity algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityAlgorithm {
    Jaccard,
    WeightedJaccard,
    AdamicAdar,
    WeightedAdamicAdar,
}

impl SimilarityAlgorithm {
    /// Configuration identifier of this algorithm
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityAlgorithm::Jaccard => "jaccard",
            SimilarityAlgorithm::WeightedJaccard => "weighted_jaccard",
            SimilarityAlgorithm::AdamicAdar => "adamic_adar",
            SimilarityAlgorithm::WeightedAdamicAdar => "weighted_adamic_adar",
        }
    }

    /// All supported algorithms
    pub fn all() -> [SimilarityAlgorithm; 4] {
        [
            SimilarityAlgorithm::Jaccard,
            SimilarityAlgorithm::WeightedJaccard,
            SimilarityAlgorithm::AdamicAdar,
            SimilarityAlgorithm::WeightedAdamicAdar,
        ]
    }

    /// Whether the algorithm consumes edge weights
    pub fn is_weighted(&self) -> bool {
        matches!(
            self,
            SimilarityAlgorithm::WeightedJaccard | SimilarityAlgorithm::WeightedAdamicAdar
        )
    }
}

impl fmt::Display for SimilarityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jaccard" => Ok(SimilarityAlgorithm::Jaccard),
            "weighted_jaccard" => Ok(SimilarityAlgorithm::WeightedJaccard),
            "adamic_adar" => Ok(SimilarityAlgorithm::AdamicAdar),
            "weighted_adamic_adar" => Ok(SimilarityAlgorithm::WeightedAdamicAdar),
            other => Err(AppError::UnsupportedAlgorithm { name: other.to_string() }),
        }
    }
}

/// Pairwise similarity scorer bound to one graph
pub struct SimilarityScorer<'g> {
    graph: &'g CoauthorshipGraph,
    algorithm: SimilarityAlgorithm,

    /// `1/ln(degree)` per node, only for the Adamic-Adar variants and only
    /// for nodes with (weighted) degree >= 2
    inv_log_degree: HashMap<NodeId, f64>,
}

impl<'g> SimilarityScorer<'g> {
    /// Create a scorer, precomputing per-graph tables where the algorithm
    /// needs them
    pub fn new(graph: &'g CoauthorshipGraph, algorithm: SimilarityAlgorithm) -> Self {
        let inv_log_degree = match algorithm {
            SimilarityAlgorithm::AdamicAdar => inv_log_degrees(graph, false),
            SimilarityAlgorithm::WeightedAdamicAdar => inv_log_degrees(graph, true),
            _ => HashMap::new(),
        };
        Self {
            graph,
            algorithm,
            inv_log_degree,
        }
    }

    /// Similarity of an unordered node pair. Symmetric in its arguments.
    pub fn score(&self, u: NodeId, v: NodeId) -> f64 {
        match self.algorithm {
            SimilarityAlgorithm::Jaccard => self.jaccard(u, v),
            SimilarityAlgorithm::WeightedJaccard => self.weighted_jaccard(u, v),
            SimilarityAlgorithm::AdamicAdar | SimilarityAlgorithm::WeightedAdamicAdar => {
                self.adamic_adar(u, v)
            }
        }
    }

    fn jaccard(&self, u: NodeId, v: NodeId) -> f64 {
        let neighbors_u: HashSet<NodeId> = self.graph.neighbors(u).map(|(n, _)| n).collect();
        let neighbors_v: HashSet<NodeId> = self.graph.neighbors(v).map(|(n, _)| n).collect();

        let common = neighbors_u.intersection(&neighbors_v).count();
        if common == 0 {
            return 0.0;
        }
        let union = neighbors_u.union(&neighbors_v).count();
        common as f64 / union as f64
    }

    fn weighted_jaccard(&self, u: NodeId, v: NodeId) -> f64 {
        let neighbors_u: HashMap<NodeId, f64> = self.graph.neighbors(u).collect();
        let neighbors_v: HashMap<NodeId, f64> = self.graph.neighbors(v).collect();

        let mut numerator = 0.0;
        let mut any_common = false;
        for (w, &weight_u) in &neighbors_u {
            if let Some(&weight_v) = neighbors_v.get(w) {
                numerator += weight_u.min(weight_v);
                any_common = true;
            }
        }
        if !any_common {
            return 0.0;
        }

        let union: HashSet<&NodeId> = neighbors_u.keys().chain(neighbors_v.keys()).collect();
        let denominator: f64 = union
            .into_iter()
            .map(|w| {
                let weight_u = neighbors_u.get(w).copied().unwrap_or(0.0);
                let weight_v = neighbors_v.get(w).copied().unwrap_or(0.0);
                weight_u.max(weight_v)
            })
            .sum();
        if denominator == 0.0 {
            return 0.0;
        }
        numerator / denominator
    }

    fn adamic_adar(&self, u: NodeId, v: NodeId) -> f64 {
        let neighbors_u: HashSet<NodeId> = self.graph.neighbors(u).map(|(n, _)| n).collect();
        self.graph
            .neighbors(v)
            .filter(|(w, _)| neighbors_u.contains(w))
            .filter_map(|(w, _)| self.inv_log_degree.get(&w))
            .sum()
    }
}

/// Precompute `1/ln(degree)` for every node with (weighted) degree >= 2.
/// Lower-degree nodes are skipped: their logarithm would be non-positive
/// and the index is undefined for them.
fn inv_log_degrees(graph: &CoauthorshipGraph, weighted: bool) -> HashMap<NodeId, f64> {
    graph
        .nodes()
        .filter_map(|node| {
            let degree = if weighted {
                graph.weighted_degree(node)
            } else {
                graph.degree(node) as f64
            };
            if degree < 2.0 {
                None
            } else {
                Some((node, 1.0 / degree.ln()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};

    fn path_graph() -> CoauthorshipGraph {
        // 1 - 2 - 3 - 4
        let mut g = CoauthorshipGraph::new("path");
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();
        g
    }

    #[test]
    fn test_parse_identifiers() {
        for algorithm in SimilarityAlgorithm::all() {
            assert_eq!(algorithm.as_str().parse::<SimilarityAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_parse_unknown_identifier() {
        let err = "cosine".parse::<SimilarityAlgorithm>().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedAlgorithm { ref name } if name == "cosine"));
    }

    #[test]
    fn test_jaccard_path() {
        let g = path_graph();
        let scorer = SimilarityScorer::new(&g, SimilarityAlgorithm::Jaccard);

        // N(1)={2}, N(3)={2,4}: one common of two in the union
        assert_relative_eq!(scorer.score(1, 3), 0.5);
        // adjacent endpoints share no neighbor on a path
        assert_relative_eq!(scorer.score(1, 2), 0.0);
        assert_relative_eq!(scorer.score(1, 4), 0.0);
    }

    #[test]
    fn test_score_symmetry() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 3.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 2.0).unwrap();
        g.add_edge(1, 4, 1.0).unwrap();

        for algorithm in SimilarityAlgorithm::all() {
            let scorer = SimilarityScorer::new(&g, algorithm);
            assert_relative_eq!(scorer.score(1, 3), scorer.score(3, 1));
            assert_relative_eq!(scorer.score(2, 4), scorer.score(4, 2));
        }
    }

    #[test]
    fn test_weighted_jaccard() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 3.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 2.0).unwrap();
        let scorer = SimilarityScorer::new(&g, SimilarityAlgorithm::WeightedJaccard);

        // common {2}: min(3,1)=1; union {2,4}: max(3,1) + max(0,2) = 5
        assert_relative_eq!(scorer.score(1, 3), 0.2);
        // no common neighbors
        assert_relative_eq!(scorer.score(1, 4), 0.0);
    }

    #[test]
    fn test_weighted_jaccard_zero_denominator() {
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 0.0).unwrap();
        g.add_edge(2, 3, 0.0).unwrap();
        let scorer = SimilarityScorer::new(&g, SimilarityAlgorithm::WeightedJaccard);
        assert_relative_eq!(scorer.score(1, 3), 0.0);
    }

    #[test]
    fn test_adamic_adar() {
        let g = path_graph();
        let scorer = SimilarityScorer::new(&g, SimilarityAlgorithm::AdamicAdar);

        // common neighbor 2 has degree 2
        assert_relative_eq!(scorer.score(1, 3), 1.0 / 2.0f64.ln());
        assert_relative_eq!(scorer.score(1, 2), 0.0);

        let mut star = CoauthorshipGraph::new("star");
        star.add_edge(0, 1, 1.0).unwrap();
        star.add_edge(0, 2, 1.0).unwrap();
        star.add_edge(0, 3, 1.0).unwrap();
        let scorer = SimilarityScorer::new(&star, SimilarityAlgorithm::AdamicAdar);
        assert_relative_eq!(scorer.score(1, 2), 1.0 / 3.0f64.ln());
    }

    #[test]
    fn test_weighted_adamic_adar_degree_floor() {
        // common neighbor 2 has weighted degree 1.8 and is skipped
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 0.9).unwrap();
        g.add_edge(2, 3, 0.9).unwrap();
        let scorer = SimilarityScorer::new(&g, SimilarityAlgorithm::WeightedAdamicAdar);
        assert_relative_eq!(scorer.score(1, 3), 0.0);

        // at exactly 2.0 the table includes it
        let mut g = CoauthorshipGraph::new("t");
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        let scorer = SimilarityScorer::new(&g, SimilarityAlgorithm::WeightedAdamicAdar);
        assert_relative_eq!(scorer.score(1, 3), 1.0 / 2.0f64.ln());
    }

    #[test]
    fn test_uniform_weights_match_unweighted_jaccard() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut g = CoauthorshipGraph::new("random");
        for u in 0..12u64 {
            for v in (u + 1)..12 {
                if rng.gen_bool(0.4) {
                    g.add_edge(u, v, 1.0).unwrap();
                }
            }
        }

        let plain = SimilarityScorer::new(&g, SimilarityAlgorithm::Jaccard);
        let weighted = SimilarityScorer::new(&g, SimilarityAlgorithm::WeightedJaccard);
        for u in 0..12u64 {
            for v in (u + 1)..12 {
                assert_relative_eq!(plain.score(u, v), weighted.score(u, v));
            }
        }
    }
}
