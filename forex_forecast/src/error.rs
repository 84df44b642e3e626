//! Error types for the forex_forecast crate

use thiserror::Error;

/// Custom error types for the forex_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Input text could not be deserialized
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A timestamp string matched none of the accepted formats
    #[error("Invalid timestamp '{0}'")]
    TimestampError(String),

    /// Too few observations for the requested model order
    #[error("Insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Numerical failure while estimating or evaluating a model
    #[error("Model error: {0}")]
    ModelError(String),

    /// The optimizer stopped before reaching its tolerance
    #[error("Model did not converge after {iterations} iterations")]
    ConvergenceError { iterations: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
