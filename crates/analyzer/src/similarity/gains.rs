//! Similarity-and-gain aggregation
//!
//! Builds a sparse per-node table: baseline average similarity over the
//! whole graph ("Base" column, gain 0), then one column per target feature
//! holding each node's average similarity inside its own feature-value
//! subgraph and the relative gain against the baseline.

use super::algos::SimilarityAlgorithm;
use super::average::average_similarity;
use super::partition::partition_by_feature;
use crate::report::StatsReporter;
use plenum_common::graph::{CoauthorshipGraph, NodeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Label of the whole-graph baseline column
pub const BASE_COLUMN: &str = "Base";

/// Synthetic label carrying the across-labels mean of a feature
pub const GLOBAL_LABEL: &str = "global";

/// One cell of a feature column
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityCell {
    /// Feature value this node holds
    pub label: String,

    /// Average similarity inside the node's feature-value subgraph
    pub value: f64,

    /// `|value - baseline| / baseline`; `None` when the baseline is
    /// missing for the node or exactly zero (undefined, never 0)
    pub gain: Option<f64>,
}

/// Sparse similarity-and-gain table for one (graph, algorithm) run
#[derive(Debug)]
pub struct SimilarityTable {
    /// Period label of the underlying graph
    pub period: String,

    /// Algorithm the table was computed with
    pub algorithm: SimilarityAlgorithm,

    /// Whole-graph average similarity per node (the "Base" column values)
    pub baseline: HashMap<NodeId, f64>,

    /// Retained feature columns
    pub columns: BTreeMap<String, HashMap<NodeId, SimilarityCell>>,

    /// Features dropped for lack of usable data, in request order
    pub dropped_features: Vec<String>,
}

impl SimilarityTable {
    /// The "Base" column cell of a node: its baseline value with gain 0
    pub fn base_cell(&self, node: NodeId) -> Option<SimilarityCell> {
        self.baseline.get(&node).map(|&value| SimilarityCell {
            label: BASE_COLUMN.to_string(),
            value,
            gain: Some(0.0),
        })
    }

    /// Every node with a baseline value or at least one feature cell
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        let mut nodes: BTreeSet<NodeId> = self.baseline.keys().copied().collect();
        for column in self.columns.values() {
            nodes.extend(column.keys().copied());
        }
        nodes
    }
}

/// Relative gain of a feature value over the baseline. Undefined (`None`)
/// when there is no baseline for the node or the baseline is exactly zero.
fn gain_over_baseline(value: f64, baseline: Option<f64>) -> Option<f64> {
    match baseline {
        Some(base) if base != 0.0 => Some((value - base).abs() / base),
        _ => None,
    }
}

/// Compute the full similarity-and-gain table for one graph and algorithm.
///
/// Features carried by no node, and features whose partitions produce no
/// measurable score at all, are dropped from the table and reported; a
/// dropped feature is never an error.
pub fn compute_table(
    graph: &CoauthorshipGraph,
    algorithm: SimilarityAlgorithm,
    target_features: &[String],
    reporter: &dyn StatsReporter,
) -> SimilarityTable {
    let period = graph.name().to_string();
    let baseline = average_similarity(graph, algorithm);
    reporter.baseline_computed(&period, algorithm.as_str(), baseline.len());

    let mut columns = BTreeMap::new();
    let mut dropped_features = Vec::new();

    for feature in target_features {
        let parts = partition_by_feature(graph, feature);
        if parts.is_empty() {
            dropped_features.push(feature.clone());
            reporter.feature_dropped(&period, algorithm.as_str(), feature);
            continue;
        }

        let mut column: HashMap<NodeId, SimilarityCell> = HashMap::new();
        for (label, subgraph) in &parts {
            for (node, value) in average_similarity(subgraph, algorithm) {
                let gain = gain_over_baseline(value, baseline.get(&node).copied());
                column.insert(
                    node,
                    SimilarityCell {
                        label: label.clone(),
                        value,
                        gain,
                    },
                );
            }
        }

        if column.is_empty() {
            dropped_features.push(feature.clone());
            reporter.feature_dropped(&period, algorithm.as_str(), feature);
            continue;
        }

        reporter.feature_computed(&period, algorithm.as_str(), feature, parts.len());
        columns.insert(feature.clone(), column);
    }

    SimilarityTable {
        period,
        algorithm,
        baseline,
        columns,
        dropped_features,
    }
}

/// Per-feature gain summary: feature -> label -> mean gain, with the
/// synthetic "global" label holding the column-wide mean
#[derive(Debug)]
pub struct GainsByFeature {
    pub period: String,
    pub features: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Per-node gains: node -> feature -> gain, defined cells only
#[derive(Debug)]
pub struct GainsByNode {
    pub period: String,
    pub rows: BTreeMap<NodeId, BTreeMap<String, f64>>,
}

/// Aggregate a table into per-label mean gains. Means run over defined
/// gains only; labels (and the "global" entry) with no defined gain are
/// left out.
pub fn gains_by_feature(table: &SimilarityTable) -> GainsByFeature {
    let mut features = BTreeMap::new();
    for (feature, column) in &table.columns {
        let mut label_sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut total = (0.0, 0usize);
        for cell in column.values() {
            if let Some(gain) = cell.gain {
                let entry = label_sums.entry(cell.label.clone()).or_insert((0.0, 0));
                entry.0 += gain;
                entry.1 += 1;
                total.0 += gain;
                total.1 += 1;
            }
        }

        let mut means: BTreeMap<String, f64> = label_sums
            .into_iter()
            .map(|(label, (sum, count))| (label, sum / count as f64))
            .collect();
        if total.1 > 0 {
            means.insert(GLOBAL_LABEL.to_string(), total.0 / total.1 as f64);
        }
        features.insert(feature.clone(), means);
    }

    GainsByFeature {
        period: table.period.clone(),
        features,
    }
}

/// Project a table onto per-node rows. Every node measured anywhere gets a
/// row; undefined gains stay absent from it.
pub fn gains_by_node(table: &SimilarityTable) -> GainsByNode {
    let mut rows: BTreeMap<NodeId, BTreeMap<String, f64>> = BTreeMap::new();
    for node in table.node_ids() {
        rows.insert(node, BTreeMap::new());
    }
    for (feature, column) in &table.columns {
        for (node, cell) in column {
            if let Some(gain) = cell.gain {
                rows.entry(*node).or_default().insert(feature.clone(), gain);
            }
        }
    }

    GainsByNode {
        period: table.period.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::{Event, RecordingReporter};
    use approx::assert_relative_eq;
    use std::collections::BTreeMap as Features;

    /// Two party cliques joined by a bridge edge
    fn two_cliques() -> CoauthorshipGraph {
        let mut g = CoauthorshipGraph::new("2013");
        for node in [1, 2, 3] {
            g.add_node_with_features(
                node,
                Features::from([("party".to_string(), "X".to_string())]),
            );
        }
        for node in [4, 5, 6] {
            g.add_node_with_features(
                node,
                Features::from([("party".to_string(), "Y".to_string())]),
            );
        }
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(1, 3, 1.0).unwrap();
        g.add_edge(4, 5, 1.0).unwrap();
        g.add_edge(5, 6, 1.0).unwrap();
        g.add_edge(4, 6, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();
        g
    }

    #[test]
    fn test_gain_over_baseline() {
        assert_relative_eq!(gain_over_baseline(0.4, Some(0.5)).unwrap(), 0.2);
        // absolute value: losses count as gains
        assert_relative_eq!(gain_over_baseline(0.6, Some(0.5)).unwrap(), 0.2);
        assert_eq!(gain_over_baseline(0.4, Some(0.0)), None);
        assert_eq!(gain_over_baseline(0.4, None), None);
    }

    #[test]
    fn test_base_column_gain_is_zero() {
        let g = two_cliques();
        let reporter = RecordingReporter::default();
        let table = compute_table(
            &g,
            SimilarityAlgorithm::Jaccard,
            &["party".to_string()],
            &reporter,
        );

        for node in table.baseline.keys() {
            let cell = table.base_cell(*node).unwrap();
            assert_eq!(cell.label, BASE_COLUMN);
            assert_eq!(cell.gain, Some(0.0));
        }
    }

    #[test]
    fn test_two_clique_gains() {
        let g = two_cliques();
        let reporter = RecordingReporter::default();
        let table = compute_table(
            &g,
            SimilarityAlgorithm::Jaccard,
            &["party".to_string()],
            &reporter,
        );

        // both partitions are cliques, so every feature value is 1.0
        let column = &table.columns["party"];
        assert_eq!(column.len(), 6);
        for cell in column.values() {
            assert_relative_eq!(cell.value, 1.0);
        }

        // node 3 baseline is 1/4, so its gain is |1 - 1/4| / (1/4) = 3
        assert_relative_eq!(column[&3].gain.unwrap(), 3.0);
        // node 1 baseline is 5/18
        assert_relative_eq!(column[&1].gain.unwrap(), 13.0 / 5.0);

        let by_feature = gains_by_feature(&table);
        let party = &by_feature.features["party"];
        assert_relative_eq!(party["X"], 41.0 / 15.0);
        assert_relative_eq!(party["Y"], 41.0 / 15.0);
        assert_relative_eq!(party[GLOBAL_LABEL], 41.0 / 15.0);
    }

    #[test]
    fn test_path_party_gains() {
        // path 1-2-3-4 with parties {1,2} = X and {3,4} = Y; every baseline
        // average is 1/2 and both party subgraphs are two-node cliques
        let mut g = CoauthorshipGraph::new("t");
        for (node, party) in [(1, "X"), (2, "X"), (3, "Y"), (4, "Y")] {
            g.add_node_with_features(
                node,
                Features::from([("party".to_string(), party.to_string())]),
            );
        }
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 1.0).unwrap();
        g.add_edge(3, 4, 1.0).unwrap();

        let reporter = RecordingReporter::default();
        let table = compute_table(
            &g,
            SimilarityAlgorithm::Jaccard,
            &["party".to_string()],
            &reporter,
        );

        for node in [1, 2, 3, 4] {
            assert_relative_eq!(table.baseline[&node], 0.5);
            let cell = &table.columns["party"][&node];
            assert_relative_eq!(cell.value, 1.0);
            assert_relative_eq!(cell.gain.unwrap(), 1.0);
        }

        let by_feature = gains_by_feature(&table);
        let party = &by_feature.features["party"];
        assert_relative_eq!(party["X"], 1.0);
        assert_relative_eq!(party["Y"], 1.0);
        assert_relative_eq!(party[GLOBAL_LABEL], 1.0);
    }

    #[test]
    fn test_missing_feature_dropped_and_reported() {
        let g = two_cliques();
        let reporter = RecordingReporter::default();
        let table = compute_table(
            &g,
            SimilarityAlgorithm::Jaccard,
            &["party".to_string(), "region".to_string()],
            &reporter,
        );

        assert_eq!(table.dropped_features, vec!["region".to_string()]);
        assert!(!table.columns.contains_key("region"));
        assert_eq!(reporter.dropped_features(), vec!["region".to_string()]);

        let by_feature = gains_by_feature(&table);
        assert!(!by_feature.features.contains_key("region"));
    }

    #[test]
    fn test_node_without_baseline_gets_undefined_gain() {
        // star center scores zero against every leaf and has no baseline;
        // alone in its party it forms a trivial clique with value 1.0
        let mut g = CoauthorshipGraph::new("t");
        g.add_node_with_features(0, Features::from([("party".to_string(), "Z".to_string())]));
        for leaf in [1, 2, 3] {
            g.add_node_with_features(
                leaf,
                Features::from([("party".to_string(), "X".to_string())]),
            );
            g.add_edge(0, leaf, 1.0).unwrap();
        }

        let reporter = RecordingReporter::default();
        let table = compute_table(
            &g,
            SimilarityAlgorithm::Jaccard,
            &["party".to_string()],
            &reporter,
        );

        let center = &table.columns["party"][&0];
        assert_relative_eq!(center.value, 1.0);
        assert_eq!(center.gain, None);
        assert!(table.base_cell(0).is_none());
    }

    #[test]
    fn test_gains_by_node_rows() {
        let g = two_cliques();
        let reporter = RecordingReporter::default();
        let table = compute_table(
            &g,
            SimilarityAlgorithm::Jaccard,
            &["party".to_string()],
            &reporter,
        );

        let by_node = gains_by_node(&table);
        assert_eq!(by_node.period, "2013");
        assert_eq!(by_node.rows.len(), 6);
        assert_relative_eq!(by_node.rows[&3]["party"], 3.0);
    }

    #[test]
    fn test_reporter_sees_pipeline_events() {
        let g = two_cliques();
        let reporter = RecordingReporter::default();
        compute_table(
            &g,
            SimilarityAlgorithm::WeightedJaccard,
            &["party".to_string()],
            &reporter,
        );

        let events = reporter.events.lock().unwrap();
        assert!(matches!(
            events[0],
            Event::Baseline { ref algorithm, scored_nodes: 6, .. }
                if algorithm == "weighted_jaccard"
        ));
        assert!(matches!(
            events[1],
            Event::Computed { ref feature, labels: 2, .. } if feature == "party"
        ));
    }
}
