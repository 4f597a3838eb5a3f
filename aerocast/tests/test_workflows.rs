mod common;

use aerocast::artifact::{load_model, save_model, try_load_model};
use aerocast::models::{ForecastModel, Sarima};
use aerocast::workflows::{fit_and_save, run_forecast, train_and_evaluate};
use aerocast::{FittedModel, ForecastError, ModelOrder, SarimaSpec, SeasonalOrder};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn test_train_and_evaluate_airline() {
    let series = common::airline_series();
    let report = train_and_evaluate(&series, 80, SarimaSpec::default()).unwrap();

    assert_eq!(report.train_size, 115);
    assert_eq!(report.test_size, 29);
    assert_eq!(report.evaluation.rows.len(), 29);
    assert_eq!(report.predictions.len(), 29);
    assert_eq!(report.evaluation.rows[0].month.to_string(), "1958-08");
    assert_eq!(report.evaluation.rows[28].month.to_string(), "1960-12");
    assert_eq!(report.evaluation.rows[0].actual, 505.0);

    assert!(report.evaluation.rmse.is_finite());
    assert!(report.evaluation.rmse > 0.0);
    assert_eq!(report.accuracy.rmse, report.evaluation.rmse);
    // A seasonal model should track the series to within a modest error
    assert!(report.evaluation.rmse < 50.0, "rmse = {}", report.evaluation.rmse);
}

#[test]
fn test_invalid_orders_surface_as_fit_error() {
    let series = common::airline_series();
    let spec = SarimaSpec::new(ModelOrder::new(5, 1, 0), SeasonalOrder::new(1, 0, 0, 4));
    let err = train_and_evaluate(&series, 80, spec).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitError(_)));
    assert!(err.suggestion().is_some());
}

#[test]
fn test_forecast_without_model_is_unavailable() {
    let err = run_forecast(None, 12).unwrap_err();
    assert!(matches!(err, ForecastError::ModelUnavailable(_)));
}

#[test]
fn test_forecast_twelve_months_from_saved_model() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("models").join("sarima.json");

    let series = common::airline_series();
    let estimator = Sarima::new(SarimaSpec::default());
    let fitted = fit_and_save(&series, &estimator, &path).unwrap();
    assert!(path.exists());

    let loaded = load_model(&path).expect("artifact should load");
    assert_eq!(loaded.spec(), fitted.spec());
    let restored = loaded.params().ar.iter().chain(&loaded.params().seasonal_ma);
    let original = fitted.params().ar.iter().chain(&fitted.params().seasonal_ma);
    for (a, b) in restored.zip(original) {
        assert!((a - b).abs() < 1e-12);
    }
    assert_eq!(loaded.end_month().to_string(), "1960-12");

    let result = run_forecast(Some(&loaded as &dyn FittedModel), 12).unwrap();
    assert_eq!(result.horizon(), 12);
    let months: Vec<String> = result.rows.iter().map(|r| r.month.to_string()).collect();
    let expected: Vec<String> = (1..=12).map(|m| format!("1961-{:02}", m)).collect();
    assert_eq!(months, expected);

    for row in &result.rows {
        assert!(row.lower <= row.predicted && row.predicted <= row.upper);
    }

    // Loading does not change the forecast
    let direct = fitted.get_forecast(12).unwrap();
    for (row, mean) in result.rows.iter().zip(&direct.mean) {
        assert!((row.predicted - mean).abs() < 1e-9);
    }
}

#[test]
fn test_zero_horizon_rejected() {
    let series = common::airline_series();
    let fitted = Sarima::new(SarimaSpec::default()).fit(series.observations()).unwrap();
    let err = run_forecast(Some(&fitted as &dyn FittedModel), 0).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidParameter(_)));
}

#[test]
fn test_missing_artifact_is_none() {
    let dir = tempdir().unwrap();
    assert!(load_model(dir.path().join("absent.json")).is_none());
    assert!(matches!(
        try_load_model(dir.path().join("absent.json")).unwrap_err(),
        ForecastError::ModelUnavailable(_)
    ));
}

#[test]
fn test_corrupt_artifact_is_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        try_load_model(&path).unwrap_err(),
        ForecastError::ModelUnavailable(_)
    ));
}

#[test]
fn test_artifact_with_wrong_version_is_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let series = common::airline_series();
    let fitted = Sarima::new(SarimaSpec::default()).fit(series.observations()).unwrap();
    save_model(&fitted, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let bumped = text.replace("\"format_version\": 1", "\"format_version\": 99");
    std::fs::write(&path, bumped).unwrap();

    assert!(load_model(&path).is_none());
}

#[test]
fn test_artifact_with_unordered_history_is_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");

    let series = common::airline_series();
    let spec = SarimaSpec::new(ModelOrder::new(0, 1, 0), SeasonalOrder::none());
    let fitted = Sarima::new(spec).fit(series.observations()).unwrap();
    save_model(&fitted, &path).unwrap();

    let mut artifact: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    artifact["history"].as_array_mut().unwrap().reverse();
    std::fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

    assert!(matches!(
        try_load_model(&path).unwrap_err(),
        ForecastError::ModelUnavailable(_)
    ));
    assert!(load_model(&path).is_none());
}
