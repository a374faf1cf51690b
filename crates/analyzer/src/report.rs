//! Structured event reporting for the statistics engine
//!
//! The similarity engine performs no logging of its own; it emits events
//! through a caller-supplied reporter. The runner injects the tracing-backed
//! implementation, tests inject recording stubs.

use plenum_common::errors::AppError;
use plenum_common::metrics::record_feature_dropped;
use tracing::{info, warn};

/// Sink for engine events
pub trait StatsReporter: Send + Sync {
    /// Baseline average similarity finished for a period
    fn baseline_computed(&self, period: &str, algorithm: &str, scored_nodes: usize);

    /// A feature column was computed and retained
    fn feature_computed(&self, period: &str, algorithm: &str, feature: &str, labels: usize);

    /// A feature had no usable data and was dropped from the table
    fn feature_dropped(&self, period: &str, algorithm: &str, feature: &str);
}

/// Reporter backed by tracing and the metrics facade
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl StatsReporter for TracingReporter {
    fn baseline_computed(&self, period: &str, algorithm: &str, scored_nodes: usize) {
        info!(period, algorithm, scored_nodes, "Baseline similarity computed");
    }

    fn feature_computed(&self, period: &str, algorithm: &str, feature: &str, labels: usize) {
        info!(period, algorithm, feature, labels, "Feature similarity computed");
    }

    fn feature_dropped(&self, period: &str, algorithm: &str, feature: &str) {
        let err = AppError::DegenerateFeature {
            feature: feature.to_string(),
            period: period.to_string(),
        };
        warn!(period, algorithm, feature, error = %err, "Feature dropped");
        record_feature_dropped(feature);
    }
}

#[cfg(test)]
pub mod test_support {
    use super::StatsReporter;
    use std::sync::Mutex;

    /// Recorded engine event
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Baseline { period: String, algorithm: String, scored_nodes: usize },
        Computed { period: String, algorithm: String, feature: String, labels: usize },
        Dropped { period: String, algorithm: String, feature: String },
    }

    /// Reporter that records events for assertions
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        pub events: Mutex<Vec<Event>>,
    }

    impl RecordingReporter {
        pub fn dropped_features(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|event| match event {
                    Event::Dropped { feature, .. } => Some(feature.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl StatsReporter for RecordingReporter {
        fn baseline_computed(&self, period: &str, algorithm: &str, scored_nodes: usize) {
            self.events.lock().unwrap().push(Event::Baseline {
                period: period.to_string(),
                algorithm: algorithm.to_string(),
                scored_nodes,
            });
        }

        fn feature_computed(&self, period: &str, algorithm: &str, feature: &str, labels: usize) {
            self.events.lock().unwrap().push(Event::Computed {
                period: period.to_string(),
                algorithm: algorithm.to_string(),
                feature: feature.to_string(),
                labels,
            });
        }

        fn feature_dropped(&self, period: &str, algorithm: &str, feature: &str) {
            self.events.lock().unwrap().push(Event::Dropped {
                period: period.to_string(),
                algorithm: algorithm.to_string(),
                feature: feature.to_string(),
            });
        }
    }
}
