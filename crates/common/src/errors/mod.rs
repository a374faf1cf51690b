//! Error types for the Plenum pipeline
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for different failure modes
//! - Job-severity classification (what fails a job vs. what is recovered)
//! - Error codes for machine-readable manifests

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration errors (1xxx)
    ConfigurationError,

    // Graph errors (2xxx)
    UnsupportedGraphKind,
    GraphLoadError,

    // Analysis errors (3xxx)
    UnsupportedAlgorithm,
    DegenerateFeature,

    // Internal errors (9xxx)
    InternalError,
    IoError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Configuration (1xxx)
            ErrorCode::ConfigurationError => 1001,

            // Graph (2xxx)
            ErrorCode::UnsupportedGraphKind => 2001,
            ErrorCode::GraphLoadError => 2002,

            // Analysis (3xxx)
            ErrorCode::UnsupportedAlgorithm => 3001,
            ErrorCode::DegenerateFeature => 3002,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::IoError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Analysis errors
    #[error("Unsupported similarity algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    #[error("Feature {feature} has no usable data in period {period}")]
    DegenerateFeature { feature: String, period: String },

    // Graph errors
    #[error("Unsupported graph kind: {reason}")]
    UnsupportedGraphKind { reason: String },

    #[error("Failed to load graph from {path}: {message}")]
    GraphLoad { path: String, message: String },

    // Internal errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::UnsupportedAlgorithm { .. } => ErrorCode::UnsupportedAlgorithm,
            AppError::DegenerateFeature { .. } => ErrorCode::DegenerateFeature,
            AppError::UnsupportedGraphKind { .. } => ErrorCode::UnsupportedGraphKind,
            AppError::GraphLoad { .. } => ErrorCode::GraphLoadError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Check if this error is recovered inside a job (logged, not fatal)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::DegenerateFeature { .. })
    }

    /// Check if this error fails the job that raised it
    pub fn is_job_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
