//! Feature similarity gain statistics
//!
//! Measures how much a categorical node feature explains structural
//! similarity: per-node average similarity over the whole graph (the
//! baseline) is compared against the same average inside the subgraph of
//! nodes sharing the node's feature value.

mod algos;
mod average;
mod gains;
mod partition;

pub use algos::{SimilarityAlgorithm, SimilarityScorer};
pub use average::average_similarity;
pub use gains::{
    compute_table, gains_by_feature, gains_by_node, GainsByFeature, GainsByNode, SimilarityCell,
    SimilarityTable, BASE_COLUMN, GLOBAL_LABEL,
};
pub use partition::partition_by_feature;
