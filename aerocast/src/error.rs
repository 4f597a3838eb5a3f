//! Error types for the aerocast crate

use aerocast_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the aerocast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The passenger series could not be fetched or parsed
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// The estimator rejected the chosen orders or failed on the data
    #[error("Model fit error: {0}")]
    ModelFitError(String),

    /// No usable pre-trained model artifact
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from JSON or CSV serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Whether the caller can recover by changing inputs and trying again.
    ///
    /// Only a missing data series ends the session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ForecastError::DataUnavailable(_))
    }

    /// Hint shown next to the error message, if any
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ForecastError::ModelFitError(_) => Some(
                "Try a different combination of (p,d,q) and (P,D,Q,m). \
                 Some combinations cause convergence errors.",
            ),
            ForecastError::ModelUnavailable(_) => Some(
                "Forecasting is disabled until a model artifact is available. \
                 Run `aerocast fit` to produce one.",
            ),
            ForecastError::DataUnavailable(_) => Some(
                "Check the network connection or point `--data-file` at a local copy of the CSV.",
            ),
            _ => None,
        }
    }
}

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ModelFitError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}
