//! Plenum Network Builder
//!
//! Batch binary assembling legislator co-authorship networks:
//! - Loads raw legislator and authorship records
//! - Normalizes records into the categorical node features
//! - Builds one graph per calendar year and one per legislature
//! - Writes each graph as a network artifact for the analyzer

mod assemble;
mod errors;
mod preprocess;
mod records;

use errors::BuilderError;
use plenum_common::{config::AppConfig, metrics, CoauthorshipGraph, GRAPH_FILE_SUFFIX, VERSION};
use tracing::{info, Level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting Plenum Network Builder v{}", VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    // Register metrics
    metrics::register_metrics();

    info!(
        records_dir = %config.paths.records_dir.display(),
        graphs_dir = %config.paths.graphs_dir.display(),
        first_year = config.builder.first_year,
        last_year = config.builder.last_year,
        "Builder configured"
    );

    let legislators =
        records::load_legislators(&config.paths.records_dir.join(&config.builder.legislators_file))?;
    let authorships =
        records::load_authorships(&config.paths.records_dir.join(&config.builder.authorships_file))?;

    let members = preprocess::prepare(legislators);
    let index = assemble::AuthorshipIndex::from_records(&authorships);
    info!(members = members.len(), "Records prepared");

    // One network per calendar year, then one per legislature
    let mut built = 0usize;
    for year in config.builder_years() {
        let graph = assemble::yearly_graph(year, &members, &index)?;
        save_graph(&config, &graph)?;
        built += 1;
    }
    for legislature in assemble::legislatures_of(&members) {
        let graph = assemble::legislature_graph(legislature, &members, &index)?;
        save_graph(&config, &graph)?;
        built += 1;
    }

    info!(graphs = built, "Builder finished");
    Ok(())
}

fn save_graph(config: &AppConfig, graph: &CoauthorshipGraph) -> Result<(), BuilderError> {
    let path = config
        .paths
        .graphs_dir
        .join(format!("{}{}", graph.name(), GRAPH_FILE_SUFFIX));
    graph.save_to_file(&path)?;
    metrics::record_graph_built(graph.name());
    info!(
        period = graph.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Network saved"
    );
    Ok(())
}
