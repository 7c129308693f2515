//! Error types for the forecast_features crate

use thiserror::Error;

/// Custom error types for the forecast_features crate
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Error related to loading data or table shape
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters or mismatched inputs
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A scored group whose realized sales sum to zero; the metric is
    /// undefined for such a group
    #[error("Zero sales denominator: {0}")]
    ZeroDenominator(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, FeatureError>;
