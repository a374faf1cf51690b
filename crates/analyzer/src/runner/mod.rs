//! Batch statistics runner
//!
//! Discovers graph artifacts, expands them into (graph, statistic) jobs
//! and runs the jobs on a bounded blocking pool. A failed or crashed job
//! never stops the batch; every outcome lands in the run manifest.
//! Ctrl+C stops scheduling new jobs and drains the ones in flight.

mod consolidate;

pub use consolidate::consolidate_outputs;

use crate::report::TracingReporter;
use crate::similarity::{self, SimilarityAlgorithm};
use crate::tables;
use crate::topology;
use chrono::{DateTime, Utc};
use plenum_common::errors::ErrorCode;
use plenum_common::graph::CoauthorshipGraph;
use plenum_common::metrics::JobMetrics;
use plenum_common::{AppConfig, AppError, Result, GRAPH_FILE_SUFFIX};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// What a single job computes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// Network summary plus per-node topology metrics
    Topology,

    /// Similarity gains under one algorithm identifier
    Gains { algorithm: String },
}

impl JobKind {
    fn label(&self) -> &'static str {
        match self {
            JobKind::Topology => "topology",
            JobKind::Gains { .. } => "gains",
        }
    }

    fn algorithm(&self) -> Option<String> {
        match self {
            JobKind::Topology => None,
            JobKind::Gains { algorithm } => Some(algorithm.clone()),
        }
    }
}

/// One schedulable unit of work
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub graph_path: PathBuf,
    pub kind: JobKind,
}

impl JobSpec {
    fn graph_file(&self) -> String {
        self.graph_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.graph_path.display().to_string())
    }
}

/// Terminal state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Completed,
    Failed,
    Skipped,
}

/// Manifest entry for one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub graph_file: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_features: Vec<String>,
    pub duration_ms: u64,
}

impl JobOutcome {
    fn base(spec: &JobSpec, status: JobStatus) -> Self {
        Self {
            graph_file: spec.graph_file(),
            kind: spec.kind.label().to_string(),
            algorithm: spec.kind.algorithm(),
            status,
            error: None,
            error_code: None,
            dropped_features: Vec::new(),
            duration_ms: 0,
        }
    }

    fn completed(spec: &JobSpec, dropped_features: Vec<String>, duration_ms: u64) -> Self {
        Self {
            dropped_features,
            duration_ms,
            ..Self::base(spec, JobStatus::Completed)
        }
    }

    fn failed(spec: &JobSpec, err: &AppError, duration_ms: u64) -> Self {
        Self {
            error: Some(err.to_string()),
            error_code: Some(err.code()),
            duration_ms,
            ..Self::base(spec, JobStatus::Failed)
        }
    }

    fn crashed(spec: &JobSpec, message: String) -> Self {
        Self {
            error: Some(message),
            error_code: Some(ErrorCode::InternalError),
            ..Self::base(spec, JobStatus::Failed)
        }
    }

    fn skipped(spec: &JobSpec) -> Self {
        Self::base(spec, JobStatus::Skipped)
    }
}

/// Record of one batch run
#[derive(Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_jobs: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub jobs: Vec<JobOutcome>,
}

/// Find graph artifacts under `graphs_dir`, sorted by file name
pub fn discover_graphs(graphs_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut graphs = Vec::new();
    for entry in fs::read_dir(graphs_dir)? {
        let path = entry?.path();
        let is_graph = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(GRAPH_FILE_SUFFIX));
        if path.is_file() && is_graph {
            graphs.push(path);
        }
    }
    graphs.sort();
    Ok(graphs)
}

/// Expand graph files into one topology job plus one gains job per
/// configured algorithm identifier
pub fn plan_jobs(graphs: &[PathBuf], algorithms: &[String]) -> Vec<JobSpec> {
    let mut jobs = Vec::with_capacity(graphs.len() * (algorithms.len() + 1));
    for graph_path in graphs {
        jobs.push(JobSpec {
            graph_path: graph_path.clone(),
            kind: JobKind::Topology,
        });
        for algorithm in algorithms {
            jobs.push(JobSpec {
                graph_path: graph_path.clone(),
                kind: JobKind::Gains {
                    algorithm: algorithm.clone(),
                },
            });
        }
    }
    jobs
}

/// Execute one job, returning the features dropped along the way.
///
/// The algorithm identifier is parsed here, inside the job, so that an
/// unknown name fails only the jobs that requested it.
fn execute_job(spec: &JobSpec, output_dir: &Path, target_features: &[String]) -> Result<Vec<String>> {
    let graph = CoauthorshipGraph::load_from_file(&spec.graph_path)?;

    match &spec.kind {
        JobKind::Topology => {
            let summary = topology::summarize(&graph);
            tables::write_network_summary(output_dir, &summary)?;
            let metrics = topology::node_metrics(&graph);
            tables::write_node_metrics(output_dir, graph.name(), &metrics)?;
            Ok(Vec::new())
        }
        JobKind::Gains { algorithm } => {
            let algorithm: SimilarityAlgorithm = algorithm.parse()?;
            let table =
                similarity::compute_table(&graph, algorithm, target_features, &TracingReporter);
            tables::write_gains_by_feature(
                output_dir,
                algorithm.as_str(),
                &similarity::gains_by_feature(&table),
            )?;
            tables::write_gains_by_node(
                output_dir,
                algorithm.as_str(),
                &similarity::gains_by_node(&table),
                target_features,
            )?;
            Ok(table.dropped_features)
        }
    }
}

/// Run one job to an outcome, never to an error
#[instrument(skip_all, fields(graph = %spec.graph_path.display(), kind = spec.kind.label()))]
fn run_one(spec: JobSpec, output_dir: &Path, target_features: &[String]) -> JobOutcome {
    let job_metrics = JobMetrics::start(spec.kind.label());
    let started = Instant::now();

    let outcome = match execute_job(&spec, output_dir, target_features) {
        Ok(dropped) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            info!(duration_ms, "Job completed");
            JobOutcome::completed(&spec, dropped, duration_ms)
        }
        Err(err) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            error!(error = %err, code = err.code().as_code(), "Job failed");
            JobOutcome::failed(&spec, &err, duration_ms)
        }
    };

    job_metrics.finish(outcome.status == JobStatus::Completed);
    outcome
}

/// Listens for SIGINT (Ctrl+C) and SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, draining in-flight jobs...");
        }
        _ = terminate => {
            info!("Received SIGTERM, draining in-flight jobs...");
        }
    }
}

/// Run every planned job and write the manifest. Jobs scheduled after
/// `cancelled` flips are recorded as skipped.
#[instrument(skip_all)]
pub async fn run_jobs(config: &AppConfig, cancelled: Arc<AtomicBool>) -> Result<RunManifest> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();

    let graphs = discover_graphs(&config.paths.graphs_dir)?;
    let jobs = plan_jobs(&graphs, &config.runner.algorithms);
    info!(
        run_id = %run_id,
        graphs = graphs.len(),
        jobs = jobs.len(),
        max_workers = config.runner.max_workers,
        "Starting statistics run"
    );

    let semaphore = Arc::new(Semaphore::new(config.runner.max_workers.max(1)));
    let mut outcomes = Vec::with_capacity(jobs.len());
    let mut handles = Vec::new();

    for spec in jobs {
        if cancelled.load(Ordering::SeqCst) {
            outcomes.push(JobOutcome::skipped(&spec));
            continue;
        }

        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal {
                message: "job semaphore closed".to_string(),
            })?;
        let output_dir = config.paths.output_dir.clone();
        let target_features = config.runner.target_features.clone();
        let task_spec = spec.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            run_one(task_spec, &output_dir, &target_features)
        });
        handles.push((spec, handle));
    }

    for (spec, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(join_err) => {
                error!(
                    graph = %spec.graph_path.display(),
                    error = %join_err,
                    "Job crashed"
                );
                outcomes.push(JobOutcome::crashed(&spec, join_err.to_string()));
            }
        }
    }

    outcomes.sort_by(|a, b| {
        (&a.graph_file, &a.kind, &a.algorithm).cmp(&(&b.graph_file, &b.kind, &b.algorithm))
    });

    let manifest = RunManifest {
        run_id,
        started_at,
        finished_at: Utc::now(),
        total_jobs: outcomes.len(),
        completed: outcomes
            .iter()
            .filter(|o| o.status == JobStatus::Completed)
            .count(),
        failed: outcomes
            .iter()
            .filter(|o| o.status == JobStatus::Failed)
            .count(),
        skipped: outcomes
            .iter()
            .filter(|o| o.status == JobStatus::Skipped)
            .count(),
        jobs: outcomes,
    };

    write_manifest(&config.paths.output_dir, &manifest)?;
    info!(
        completed = manifest.completed,
        failed = manifest.failed,
        skipped = manifest.skipped,
        "Statistics run finished"
    );
    Ok(manifest)
}

/// Run the batch with Ctrl+C / SIGTERM draining
pub async fn run_batch(config: &AppConfig) -> Result<RunManifest> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        flag.store(true, Ordering::SeqCst);
    });
    run_jobs(config, cancelled).await
}

fn write_manifest(output_dir: &Path, manifest: &RunManifest) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("manifest.json");
    fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
    info!(path = %path.display(), "Run manifest written");
    Ok(())
}
