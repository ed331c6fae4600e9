//! Error types for training jobs

use thiserror::Error;

/// Result type alias for trainjob operations
pub type Result<T> = std::result::Result<T, TrainJobError>;

/// Every failure a training job can hit. All of them abort the job.
#[derive(Error, Debug)]
pub enum TrainJobError {
    #[error("Input not found: {0}")]
    InputNotFound(String),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for TrainJobError {
    fn from(err: polars::error::PolarsError) -> Self {
        TrainJobError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for TrainJobError {
    fn from(err: serde_json::Error) -> Self {
        TrainJobError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for TrainJobError {
    fn from(err: bincode::Error) -> Self {
        TrainJobError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TrainJobError {
    fn from(err: ndarray::ShapeError) -> Self {
        TrainJobError::ShapeMismatch {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<ndarray_npy::ReadNpyError> for TrainJobError {
    fn from(err: ndarray_npy::ReadNpyError) -> Self {
        match err {
            ndarray_npy::ReadNpyError::WrongNdim(expected, actual) => TrainJobError::ShapeMismatch {
                expected: expected.map_or_else(|| "array".to_string(), |n| format!("{}-D array", n)),
                actual: format!("{}-D array", actual),
            },
            other => TrainJobError::Data(format!("failed to read .npy array: {}", other)),
        }
    }
}
