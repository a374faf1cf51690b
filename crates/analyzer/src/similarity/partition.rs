//! Feature-value subgraph partitioner

use plenum_common::graph::CoauthorshipGraph;
use std::collections::{BTreeMap, HashSet};

/// Partition a graph into the subgraphs induced by each distinct value of a
/// feature. Nodes missing the feature appear in no part; a feature carried
/// by no node yields an empty map. Within the result, every node with a
/// value for the feature appears in exactly one part.
pub fn partition_by_feature(
    graph: &CoauthorshipGraph,
    feature: &str,
) -> BTreeMap<String, CoauthorshipGraph> {
    let mut parts = BTreeMap::new();
    for value in graph.feature_values(feature) {
        let members: HashSet<_> = graph.nodes_with(feature, &value).into_iter().collect();
        let subgraph = graph.induced_subgraph(&members);
        parts.insert(value, subgraph);
    }
    parts
}
