//! Metrics and observability utilities
//!
//! Provides pipeline counters and histograms on the `metrics` facade
//! with standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Plenum metrics
pub const METRICS_PREFIX: &str = "plenum";

/// Register all metric descriptions
pub fn register_metrics() {
    // Runner metrics
    describe_counter!(
        format!("{}_jobs_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of statistics jobs executed"
    );

    describe_counter!(
        format!("{}_jobs_failed_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of statistics jobs that failed"
    );

    describe_histogram!(
        format!("{}_job_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Statistics job duration in seconds"
    );

    // Engine metrics
    describe_counter!(
        format!("{}_features_dropped_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of features dropped for lack of usable data"
    );

    // Builder metrics
    describe_counter!(
        format!("{}_graphs_built_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of network artifacts written"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record job metrics
pub struct JobMetrics {
    start: Instant,
    kind: String,
}

impl JobMetrics {
    /// Start tracking a job
    pub fn start(kind: &str) -> Self {
        Self {
            start: Instant::now(),
            kind: kind.to_string(),
        }
    }

    /// Record job completion
    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed().as_secs_f64();
        let status = if success { "completed" } else { "failed" };

        counter!(
            format!("{}_jobs_total", METRICS_PREFIX),
            "kind" => self.kind.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        if !success {
            counter!(
                format!("{}_jobs_failed_total", METRICS_PREFIX),
                "kind" => self.kind.clone()
            )
            .increment(1);
        }

        histogram!(
            format!("{}_job_duration_seconds", METRICS_PREFIX),
            "kind" => self.kind
        )
        .record(duration);
    }
}

/// Helper to record a dropped feature
pub fn record_feature_dropped(feature: &str) {
    counter!(
        format!("{}_features_dropped_total", METRICS_PREFIX),
        "feature" => feature.to_string()
    )
    .increment(1);
}

/// Helper to record a written network artifact
pub fn record_graph_built(period: &str) {
    counter!(
        format!("{}_graphs_built_total", METRICS_PREFIX),
        "period" => period.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_metrics() {
        let metrics = JobMetrics::start("gains");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(true);
        // Just verify it runs without panic
    }

    #[test]
    fn test_counters() {
        record_feature_dropped("ethnicity");
        record_graph_built("2013");
    }
}
