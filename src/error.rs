//! Error types for the laptop price pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PricerError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum PricerError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for PricerError {
    fn from(err: polars::error::PolarsError) -> Self {
        PricerError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PricerError {
    fn from(err: serde_json::Error) -> Self {
        PricerError::SerializationError(err.to_string())
    }
}
