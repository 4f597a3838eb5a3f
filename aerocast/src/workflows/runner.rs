//! Forward forecasting from a pre-fitted model

use crate::data::Month;
use crate::error::{ForecastError, Result};
use crate::models::FittedModel;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One forecast month with its interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub month: Month,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecast rows for a requested horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: String,
    pub confidence_level: f64,
    pub rows: Vec<ForecastRow>,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.rows.len()
    }
}

/// Forecast `horizon` months past the end of the model's sample.
///
/// A missing model short-circuits with `ModelUnavailable`; nothing is refitted.
pub fn run_forecast(model: Option<&dyn FittedModel>, horizon: usize) -> Result<ForecastResult> {
    let model = model.ok_or_else(|| {
        ForecastError::ModelUnavailable("No pre-trained model is loaded".to_string())
    })?;

    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast horizon must be at least 1".to_string(),
        ));
    }

    let table = model.get_forecast(horizon)?;
    if table.len() != horizon {
        return Err(ForecastError::ValidationError(format!(
            "Model returned {} forecast steps, expected {}",
            table.len(),
            horizon
        )));
    }

    let last = model.end_month();
    let mut rows = Vec::with_capacity(horizon);
    for step in 0..horizon {
        rows.push(ForecastRow {
            month: last.add_months(step as u32 + 1)?,
            predicted: table.mean[step],
            lower: table.lower[step],
            upper: table.upper[step],
        });
    }

    info!(model = %model.name(), horizon, from = %last, "forecast produced");

    Ok(ForecastResult {
        model: model.name(),
        confidence_level: table.confidence_level,
        rows,
    })
}
