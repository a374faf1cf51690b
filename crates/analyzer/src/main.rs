//! Plenum Statistics Analyzer
//!
//! Batch service computing statistics over legislator co-authorship
//! networks:
//! - Similarity gains per categorical feature (Jaccard, Adamic-Adar and
//!   their weighted variants)
//! - Network topology summaries (density, components, clustering, diameter)
//! - Per-node metrics (degree, PageRank, closeness, betweenness)
//! - Cross-period consolidation of all result tables

mod report;
mod runner;
mod similarity;
mod tables;
mod topology;

use plenum_common::{config::AppConfig, metrics, VERSION};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting Plenum Statistics Analyzer v{}", VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    // Register metrics
    metrics::register_metrics();

    info!(
        graphs_dir = %config.paths.graphs_dir.display(),
        output_dir = %config.paths.output_dir.display(),
        algorithms = config.runner.algorithms.len(),
        "Analyzer configured"
    );

    // Run every (graph, statistic) job and write the manifest
    let manifest = runner::run_batch(&config).await?;

    // Stitch per-period tables into the consolidated views
    let consolidated = runner::consolidate_outputs(
        &config.paths.output_dir,
        &config.runner.algorithms,
        &config.runner.target_features,
    )?;

    info!(
        run_id = %manifest.run_id,
        completed = manifest.completed,
        failed = manifest.failed,
        skipped = manifest.skipped,
        consolidated_files = consolidated,
        "Analyzer finished"
    );
    Ok(())
}
