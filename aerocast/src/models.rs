//! Forecasting model interfaces and order specifications

use crate::data::{Month, Observation};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Non-seasonal orders `(p, d, q)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelOrder {
    /// Autoregressive order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average order
    pub q: usize,
}

/// Seasonal orders `(P, D, Q, m)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal autoregressive order (P)
    pub p: usize,
    /// Seasonal differencing order (D)
    pub d: usize,
    /// Seasonal moving-average order (Q)
    pub q: usize,
    /// Season length in periods (m)
    pub m: usize,
}

impl ModelOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, m: usize) -> Self {
        Self { p, d, q, m }
    }

    /// No seasonal component
    pub fn none() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_seasonal(&self) -> bool {
        self.p > 0 || self.d > 0 || self.q > 0
    }
}

/// Full seasonal ARIMA specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SarimaSpec {
    pub order: ModelOrder,
    pub seasonal_order: SeasonalOrder,
}

impl SarimaSpec {
    pub fn new(order: ModelOrder, seasonal_order: SeasonalOrder) -> Self {
        Self {
            order,
            seasonal_order,
        }
    }

    /// Number of estimated ARMA coefficients
    pub fn n_params(&self) -> usize {
        self.order.p + self.order.q + self.seasonal_order.p + self.seasonal_order.q
    }

    /// Observations consumed by differencing
    pub fn differencing_lags(&self) -> usize {
        self.order.d + self.seasonal_order.d * self.seasonal_order.m
    }

    /// Highest lag of the autoregressive side once differencing is folded in
    pub fn max_ar_lag(&self) -> usize {
        self.order.p + self.seasonal_order.p * self.seasonal_order.m + self.differencing_lags()
    }
}

impl Default for SarimaSpec {
    /// The airline configuration `(1,1,1)(1,1,1,12)`
    fn default() -> Self {
        Self::new(ModelOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12))
    }
}

impl fmt::Display for SarimaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{},{})",
            self.order.p,
            self.order.d,
            self.order.q,
            self.seasonal_order.p,
            self.seasonal_order.d,
            self.seasonal_order.q,
            self.seasonal_order.m
        )
    }
}

/// Mean path and two-sided interval for a forecast horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Coverage of the interval, e.g. 0.95
    pub confidence_level: f64,
}

impl ForecastTable {
    pub fn new(mean: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>, confidence_level: f64) -> Result<Self> {
        if mean.len() != lower.len() || mean.len() != upper.len() {
            return Err(ForecastError::ValidationError(format!(
                "Mean ({}), lower ({}) and upper ({}) lengths differ",
                mean.len(),
                lower.len(),
                upper.len()
            )));
        }
        Ok(Self {
            mean,
            lower,
            upper,
            confidence_level,
        })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// A model estimated against a series, ready to predict
pub trait FittedModel: Debug {
    /// Level predictions for the inclusive index range `start..=end`.
    ///
    /// Indices inside the fitted sample give one-step-ahead fitted values;
    /// indices past its end give forecasts.
    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>>;

    /// Forecast `steps` periods past the end of the sample, with intervals
    fn get_forecast(&self, steps: usize) -> Result<ForecastTable>;

    /// Last month of the fitted sample
    fn end_month(&self) -> Month;

    /// Number of observations the model was fitted on
    fn n_observations(&self) -> usize;

    /// Name of the model
    fn name(&self) -> String;
}

/// Forecast model that can be fitted to observations
pub trait ForecastModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Estimate the model on `data`
    fn fit(&self, data: &[Observation]) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> String;
}

pub mod sarima;

pub use sarima::{FitDiagnostics, FittedSarima, Sarima, SarimaParams};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_display() {
        assert_eq!(SarimaSpec::default().to_string(), "SARIMA(1,1,1)(1,1,1,12)");
    }

    #[test]
    fn test_spec_lags() {
        let spec = SarimaSpec::default();
        assert_eq!(spec.n_params(), 4);
        assert_eq!(spec.differencing_lags(), 13);
        assert_eq!(spec.max_ar_lag(), 1 + 12 + 13);
    }

    #[test]
    fn test_forecast_table_length_check() {
        assert!(ForecastTable::new(vec![1.0], vec![0.5], vec![], 0.95).is_err());
        let table = ForecastTable::new(vec![1.0], vec![0.5], vec![1.5], 0.95).unwrap();
        assert_eq!(table.len(), 1);
    }
}
