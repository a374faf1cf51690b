//! Cross-period consolidation
//!
//! Concatenates the per-period tables of a finished run into one file per
//! statistic under `consolidated/`. Files whose header disagrees with the
//! first file of their group are skipped with a warning, so one malformed
//! period cannot poison the combined table.

use crate::similarity::SimilarityAlgorithm;
use plenum_common::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// CSV files directly under `dir`, sorted by name. A missing directory is
/// an empty group.
fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(err) => return Err(err.into()),
    };
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "csv");
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate `files` into `target`, keeping one header. Returns whether
/// a file was written.
fn concat_tables(files: &[PathBuf], target: &Path) -> Result<bool> {
    let mut expected_header: Option<String> = None;
    let mut rows: Vec<String> = Vec::new();

    for file in files {
        let content = fs::read_to_string(file)?;
        let mut lines = content.lines();
        let Some(header) = lines.next() else {
            continue;
        };
        match &expected_header {
            None => expected_header = Some(header.to_string()),
            Some(expected) if expected != header => {
                warn!(
                    file = %file.display(),
                    expected = %expected,
                    found = header,
                    "Header mismatch, skipping file"
                );
                continue;
            }
            Some(_) => {}
        }
        rows.extend(lines.map(str::to_string));
    }

    let Some(header) = expected_header else {
        return Ok(false);
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = header;
    for row in &rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    fs::write(target, out)?;
    debug!(target = %target.display(), rows = rows.len(), "Consolidated table written");
    Ok(true)
}

/// Consolidate every per-period table under `output_dir`. Returns the
/// number of combined files written.
pub fn consolidate_outputs(
    output_dir: &Path,
    algorithms: &[String],
    target_features: &[String],
) -> Result<usize> {
    let consolidated = output_dir.join("consolidated");
    let mut written = 0;

    let networks = list_csv_files(&output_dir.join("networks"))?;
    if concat_tables(&networks, &consolidated.join("networks.csv"))? {
        written += 1;
    }

    let nodes = list_csv_files(&output_dir.join("nodes"))?;
    if concat_tables(&nodes, &consolidated.join("nodes.csv"))? {
        written += 1;
    }

    for algorithm in algorithms {
        let Ok(algorithm) = algorithm.parse::<SimilarityAlgorithm>() else {
            debug!(algorithm, "Skipping unknown algorithm in consolidation");
            continue;
        };
        let source = output_dir.join("features").join(algorithm.as_str());
        let target = consolidated.join("features").join(algorithm.as_str());

        let network_files = list_csv_files(&source.join("network"))?;
        for feature in target_features {
            let suffix = format!("_{feature}.csv");
            let group: Vec<PathBuf> = network_files
                .iter()
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.ends_with(&suffix))
                })
                .cloned()
                .collect();
            if concat_tables(&group, &target.join(format!("{feature}.csv")))? {
                written += 1;
            }
        }

        let node_files = list_csv_files(&source.join("nodes"))?;
        if concat_tables(&node_files, &target.join("nodes.csv"))? {
            written += 1;
        }
    }

    info!(files = written, "Consolidation finished");
    Ok(written)
}
