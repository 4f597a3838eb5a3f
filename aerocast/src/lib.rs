//! # Aerocast
//!
//! Seasonal ARIMA experiments on the monthly airline passenger series.
//!
//! ## Features
//!
//! - Load the passenger CSV from a URL or a local file, cached for the process lifetime
//! - Fit SARIMA `(p,d,q)(P,D,Q,m)` models by conditional least squares
//! - Hold-out evaluation: split, fit on the prefix, RMSE on the tail
//! - Forward forecasts with confidence intervals from a saved model artifact
//! - Plain-text, CSV and JSON rendering of the results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aerocast::data::{CachedProvider, RemoteCsvSource};
//! use aerocast::models::SarimaSpec;
//! use aerocast::workflows::{run_forecast, train_and_evaluate};
//!
//! let provider = CachedProvider::new(RemoteCsvSource::default());
//! let series = provider.load()?;
//!
//! // Workflow A: train on 80% and score the rest
//! let report = train_and_evaluate(&series, 80, SarimaSpec::default())?;
//! println!("RMSE: {:.2}", report.evaluation.rmse);
//!
//! // Workflow B: forecast a year ahead from a saved model
//! let model = aerocast::artifact::load_model("models/sarima_airline.json");
//! let forecast = run_forecast(model.as_ref().map(|m| m as &dyn aerocast::FittedModel), 12)?;
//! println!("{} rows", forecast.rows.len());
//! # Ok::<(), aerocast::ForecastError>(())
//! ```

pub mod artifact;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod render;
pub mod workflows;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::data::{CachedProvider, Month, Observation, TimeSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{FittedModel, ForecastModel, ModelOrder, SarimaSpec, SeasonalOrder};
pub use crate::workflows::{run_forecast, train_and_evaluate};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
