//! # Aerocast Math
//!
//! Numeric building blocks used by the seasonal ARIMA estimator.
//! This crate has no knowledge of dates, files or models; it works on
//! plain `f64` slices and lag-polynomial coefficient vectors.

use thiserror::Error;

pub mod differencing;
pub mod optimize;
pub mod polynomial;
pub mod transforms;

pub use optimize::{Minimum, NelderMead};
pub use polynomial::LagPolynomial;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
