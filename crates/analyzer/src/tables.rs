//! CSV table output
//!
//! Writes one file per (graph, statistic) pair under the output directory:
//!
//! - `networks/{period}_network.csv`: the network-level summary row
//! - `nodes/{period}_nodes.csv`: per-node topology metrics
//! - `features/{algorithm}/network/{period}_{feature}.csv`: mean gains per
//!   feature label, "global" last
//! - `features/{algorithm}/nodes/{period}_nodes.csv`: per-node gains, one
//!   column per configured feature, undefined gains left empty

use crate::similarity::{GainsByFeature, GainsByNode, GLOBAL_LABEL};
use crate::topology::{NetworkSummary, NodeMetrics};
use plenum_common::graph::NodeId;
use plenum_common::Result;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Escape quotes and wrap in quotes if the field contains a comma, quote
/// or newline
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write a header and rows to `path`, creating parent directories
fn write_table(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", header.join(","))?;
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|field| csv_escape(field)).collect();
        writeln!(writer, "{}", escaped.join(","))?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "Table written");
    Ok(())
}

/// Write the network-level summary of one period graph
pub fn write_network_summary(output_dir: &Path, summary: &NetworkSummary) -> Result<PathBuf> {
    let path = output_dir
        .join("networks")
        .join(format!("{}_network.csv", summary.period));
    let row = vec![
        summary.period.clone(),
        summary.nodes.to_string(),
        summary.edges.to_string(),
        summary.density.to_string(),
        summary.connected_components.to_string(),
        summary.largest_cc_rel_size.to_string(),
        summary.global_clustering.to_string(),
        summary.avg_clustering.to_string(),
        summary.diameter.to_string(),
    ];
    write_table(
        &path,
        &[
            "period",
            "nodes",
            "edges",
            "density",
            "connected_components",
            "largest_cc_rel_size",
            "global_clustering",
            "avg_clustering",
            "diameter",
        ],
        &[row],
    )?;
    Ok(path)
}

/// Write per-node topology metrics of one period graph
pub fn write_node_metrics(
    output_dir: &Path,
    period: &str,
    metrics: &BTreeMap<NodeId, NodeMetrics>,
) -> Result<PathBuf> {
    let path = output_dir
        .join("nodes")
        .join(format!("{period}_nodes.csv"));
    let rows: Vec<Vec<String>> = metrics
        .iter()
        .map(|(node, m)| {
            vec![
                period.to_string(),
                node.to_string(),
                m.degree.to_string(),
                m.weighted_degree.to_string(),
                m.pagerank.to_string(),
                m.closeness.to_string(),
                m.betweenness.to_string(),
            ]
        })
        .collect();
    write_table(
        &path,
        &[
            "period",
            "node_id",
            "degree",
            "weighted_degree",
            "pagerank",
            "closeness",
            "betweenness",
        ],
        &rows,
    )?;
    Ok(path)
}

/// Write one mean-gain table per retained feature, labels sorted with the
/// "global" row last
pub fn write_gains_by_feature(
    output_dir: &Path,
    algorithm: &str,
    gains: &GainsByFeature,
) -> Result<Vec<PathBuf>> {
    let dir = output_dir.join("features").join(algorithm).join("network");
    let mut written = Vec::new();

    for (feature, means) in &gains.features {
        let path = dir.join(format!("{}_{}.csv", gains.period, feature));
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(means.len());
        for (label, mean) in means {
            if label == GLOBAL_LABEL {
                continue;
            }
            rows.push(vec![
                gains.period.clone(),
                feature.clone(),
                label.clone(),
                mean.to_string(),
            ]);
        }
        if let Some(global) = means.get(GLOBAL_LABEL) {
            rows.push(vec![
                gains.period.clone(),
                feature.clone(),
                GLOBAL_LABEL.to_string(),
                global.to_string(),
            ]);
        }
        write_table(&path, &["period", "feature", "label", "mean_gain"], &rows)?;
        written.push(path);
    }

    Ok(written)
}

/// Write per-node gains with one column per configured feature. Nodes with
/// no defined gain for a feature get an empty cell.
pub fn write_gains_by_node(
    output_dir: &Path,
    algorithm: &str,
    gains: &GainsByNode,
    target_features: &[String],
) -> Result<PathBuf> {
    let path = output_dir
        .join("features")
        .join(algorithm)
        .join("nodes")
        .join(format!("{}_nodes.csv", gains.period));

    let mut header: Vec<&str> = vec!["period", "node_id"];
    header.extend(target_features.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = gains
        .rows
        .iter()
        .map(|(node, row)| {
            let mut fields = vec![gains.period.clone(), node.to_string()];
            for feature in target_features {
                fields.push(
                    row.get(feature)
                        .map(|gain| gain.to_string())
                        .unwrap_or_default(),
                );
            }
            fields
        })
        .collect();

    write_table(&path, &header, &rows)?;
    Ok(path)
}
