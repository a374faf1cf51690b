//! Plenum Common Library
//!
//! Shared code for the Plenum network pipeline including:
//! - Co-authorship graph model and its on-disk artifact format
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod graph;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, ErrorCode, Result};
pub use graph::{CoauthorshipGraph, GraphFile, NodeId};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Suffix of serialized graph artifacts (`<period>_network.json`)
pub const GRAPH_FILE_SUFFIX: &str = "_network.json";
