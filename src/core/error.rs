//! Error types for the SVM implementation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Model not fitted: call fit before predict")]
    NotFitted,

    #[error("QP solver failed: {0}")]
    NumericalError(String),

    #[error("Degenerate margin: no support vector lies strictly inside the box bound")]
    DegenerateBias,

    #[error("Invalid label: expected -1, 0 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SvmError>;
