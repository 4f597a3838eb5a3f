//! Interactive training and hold-out evaluation

use crate::artifact::save_model;
use crate::data::{Month, Observation, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::metrics::{forecast_accuracy, rmse, ForecastAccuracy};
use crate::models::{FitDiagnostics, FittedModel, FittedSarima, ForecastModel, Sarima, SarimaSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Actual and predicted count for one test month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub month: Month,
    pub actual: f64,
    pub predicted: f64,
}

/// RMSE over the test suffix and the pairs it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rmse: f64,
    pub rows: Vec<ComparisonRow>,
}

/// A single predicted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: Month,
    pub value: f64,
}

/// Everything produced by one train-and-predict run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub model: String,
    pub spec: SarimaSpec,
    pub split_pct: u32,
    pub train_size: usize,
    pub test_size: usize,
    pub train: Vec<Observation>,
    pub evaluation: EvaluationResult,
    pub predictions: Vec<ForecastPoint>,
    pub accuracy: ForecastAccuracy,
    pub diagnostics: FitDiagnostics,
}

/// Fit `spec` on the first `split_pct` percent of `series` and score it on the rest
pub fn train_and_evaluate(series: &TimeSeries, split_pct: u32, spec: SarimaSpec) -> Result<TrainingReport> {
    train_and_evaluate_with(series, split_pct, &Sarima::new(spec))
}

/// Same as [`train_and_evaluate`] with a preconfigured estimator
pub fn train_and_evaluate_with(series: &TimeSeries, split_pct: u32, model: &Sarima) -> Result<TrainingReport> {
    let split = series.split(split_pct)?;
    info!(
        model = %model.spec(),
        split_pct,
        train = split.train_size(),
        test = split.test_size(),
        "training run started"
    );

    if split.test.is_empty() {
        return Err(ForecastError::ModelFitError(format!(
            "No observations left for testing with a {}% split of {} rows",
            split_pct,
            series.len()
        )));
    }

    let fitted = model.fit(split.train)?;

    let start = split.train_size();
    let end = series.len() - 1;
    let predicted = fitted.predict(start, end)?;
    let actual: Vec<f64> = split.test.iter().map(|o| o.passengers as f64).collect();

    let score = rmse(&actual, &predicted).map_err(|e| ForecastError::ModelFitError(e.to_string()))?;
    let accuracy =
        forecast_accuracy(&actual, &predicted).map_err(|e| ForecastError::ModelFitError(e.to_string()))?;

    let rows: Vec<ComparisonRow> = split
        .test
        .iter()
        .zip(&predicted)
        .map(|(observation, value)| ComparisonRow {
            month: observation.month,
            actual: observation.passengers as f64,
            predicted: *value,
        })
        .collect();
    let predictions = rows
        .iter()
        .map(|row| ForecastPoint {
            month: row.month,
            value: row.predicted,
        })
        .collect();

    info!(model = %model.spec(), rmse = score, "training run finished");

    Ok(TrainingReport {
        model: fitted.name(),
        spec: *model.spec(),
        split_pct,
        train_size: split.train_size(),
        test_size: split.test_size(),
        train: split.train.to_vec(),
        evaluation: EvaluationResult { rmse: score, rows },
        predictions,
        accuracy,
        diagnostics: fitted.diagnostics().clone(),
    })
}

/// Fit `model` on the whole series and store it as an artifact at `path`
pub fn fit_and_save<P: AsRef<Path>>(series: &TimeSeries, model: &Sarima, path: P) -> Result<FittedSarima> {
    let fitted = model.fit(series.observations())?;
    save_model(&fitted, path)?;
    Ok(fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelOrder, SeasonalOrder};

    fn linear_series(n: usize) -> TimeSeries {
        let values: Vec<u64> = (0..n as u64).map(|i| 100 + 2 * i).collect();
        TimeSeries::from_values(Month::new(1990, 1).unwrap(), &values).unwrap()
    }

    #[test]
    fn test_full_training_split_is_rejected() {
        let series = linear_series(20);
        let err = train_and_evaluate(&series, 100, SarimaSpec::default()).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFitError(_)));
    }

    #[test]
    fn test_empty_training_split_is_a_fit_error() {
        let series = linear_series(20);
        let spec = SarimaSpec::new(ModelOrder::new(0, 1, 0), SeasonalOrder::none());
        let err = train_and_evaluate(&series, 0, spec).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFitError(_)));
    }

    #[test]
    fn test_double_differencing_extrapolates_linear_trend() {
        let series = linear_series(20);
        let spec = SarimaSpec::new(ModelOrder::new(0, 2, 0), SeasonalOrder::none());
        let report = train_and_evaluate(&series, 50, spec).unwrap();
        assert_eq!(report.train_size, 10);
        assert_eq!(report.test_size, 10);
        // second differencing extrapolates a straight line exactly
        assert!(report.evaluation.rmse < 1e-9);
    }
}
