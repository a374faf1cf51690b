//! Network builder error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Record parse error for {path}: {message}")]
    RecordParseError { path: String, message: String },

    #[error("Record file not found: {0}")]
    FileNotFound(String),

    #[error("Graph assembly error: {0}")]
    AssemblyError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<plenum_common::errors::AppError> for BuilderError {
    fn from(e: plenum_common::errors::AppError) -> Self {
        BuilderError::AssemblyError(e.to_string())
    }
}
