//! Error types for the det-eval library.

use thiserror::Error;

/// Result type for det-eval operations.
pub type Result<T> = std::result::Result<T, DetEvalError>;

/// Error types that can occur during detection evaluation.
#[derive(Error, Debug)]
pub enum DetEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from DataFrame operations.
    #[error("DataFrame error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),

    /// Invalid annotation data.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Raw detector output with mismatched parallel arrays.
    #[error("Invalid detector output: {0}")]
    InvalidDetectorOutput(String),

    /// Invalid confidence or IoU threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid evaluation configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required DataFrame column.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Malformed DataFrame contents.
    #[error("Invalid DataFrame: {0}")]
    InvalidDataFrame(String),

    /// Empty dataset provided.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),
}
