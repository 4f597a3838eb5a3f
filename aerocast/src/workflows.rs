//! The two dashboard workflows
//!
//! - [`trainer`]: split, fit on the training prefix, score the held-out tail
//! - [`runner`]: forward forecast from a pre-fitted model
//!
//! Both take plain values and return plain reports; rendering and user
//! interaction live in the caller.

pub mod runner;
pub mod trainer;

pub use runner::{run_forecast, ForecastResult, ForecastRow};
pub use trainer::{
    fit_and_save, train_and_evaluate, train_and_evaluate_with, ComparisonRow, EvaluationResult,
    ForecastPoint, TrainingReport,
};
