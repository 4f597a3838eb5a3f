mod common;

use aerocast::data::Month;
use aerocast::models::{FittedModel, ForecastModel, Sarima};
use aerocast::{ForecastError, ModelOrder, SarimaSpec, SeasonalOrder, TimeSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn airline_spec() -> SarimaSpec {
    SarimaSpec::new(ModelOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12))
}

/// Random walk whose increments follow an AR(1) with coefficient `phi`
fn integrated_ar1(phi: f64, n: usize, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut gaussian = move || {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    };

    let mut level = 5000.0;
    let mut increment = 0.0;
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        increment = phi * increment + 5.0 * gaussian();
        level += increment;
        values.push(level.round().max(0.0) as u64);
    }
    TimeSeries::from_values(Month::new(1900, 1).unwrap(), &values).unwrap()
}

#[test]
fn test_airline_configuration_fits() {
    let series = common::airline_series();
    let split = series.split(80).unwrap();

    let fitted = Sarima::new(airline_spec()).fit(split.train).unwrap();
    assert_eq!(fitted.n_observations(), 115);
    assert_eq!(fitted.end_month().to_string(), "1958-07");

    let diagnostics = fitted.diagnostics();
    assert!(diagnostics.sigma2.is_finite() && diagnostics.sigma2 > 0.0);
    assert_eq!(diagnostics.n_residuals, 115 - 26);

    let params = fitted.params();
    for coefficient in params.ar.iter().chain(&params.seasonal_ar) {
        assert!(coefficient.abs() < 1.0);
    }
    for coefficient in params.ma.iter().chain(&params.seasonal_ma) {
        assert!(coefficient.abs() < 1.0);
    }
}

#[test]
fn test_out_of_sample_predict_matches_forecast_mean() {
    let series = common::airline_series();
    let split = series.split(80).unwrap();
    let fitted = Sarima::new(airline_spec()).fit(split.train).unwrap();

    let predicted = fitted.predict(115, 143).unwrap();
    let table = fitted.get_forecast(29).unwrap();
    assert_eq!(predicted.len(), 29);
    assert_eq!(predicted, table.mean);
    assert!(predicted.iter().all(|v| v.is_finite() && *v > 0.0));
}

#[test]
fn test_intervals_contain_mean_and_widen() {
    let series = common::airline_series();
    let fitted = Sarima::new(airline_spec()).fit(series.observations()).unwrap();
    let table = fitted.get_forecast(24).unwrap();

    assert_eq!(table.confidence_level, 0.95);
    for i in 0..table.len() {
        assert!(table.lower[i] <= table.mean[i]);
        assert!(table.mean[i] <= table.upper[i]);
    }
    let first = table.upper[0] - table.lower[0];
    let last = table.upper[23] - table.lower[23];
    assert!(last > first);
}

#[test]
fn test_narrower_level_gives_narrower_interval() {
    let series = common::airline_series();
    let wide = Sarima::new(airline_spec()).fit(series.observations()).unwrap();
    let narrow = wide.clone().with_confidence_level(0.8).unwrap();

    let wide_table = wide.get_forecast(6).unwrap();
    let narrow_table = narrow.get_forecast(6).unwrap();
    assert_eq!(wide_table.mean, narrow_table.mean);
    assert!(narrow_table.upper[5] - narrow_table.lower[5] < wide_table.upper[5] - wide_table.lower[5]);
}

#[test]
fn test_recovers_ar_coefficient() {
    let series = integrated_ar1(0.6, 400, 7);
    let spec = SarimaSpec::new(ModelOrder::new(1, 1, 0), SeasonalOrder::none());
    let fitted = Sarima::new(spec).fit(series.observations()).unwrap();

    let phi = fitted.params().ar[0];
    assert!((phi - 0.6).abs() < 0.1, "estimated phi = {}", phi);
    assert!(fitted.diagnostics().converged);
}

#[test]
fn test_seasonal_period_larger_than_training_data() {
    let series = common::airline_series();
    let spec = SarimaSpec::new(ModelOrder::new(0, 0, 0), SeasonalOrder::new(0, 5, 0, 24));
    let err = Sarima::new(spec).fit(series.split(50).unwrap().train).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitError(_)));
}

#[test]
fn test_seasonal_terms_need_a_period() {
    let series = common::airline_series();
    let spec = SarimaSpec::new(ModelOrder::new(1, 1, 1), SeasonalOrder::new(1, 0, 0, 1));
    let err = Sarima::new(spec).fit(series.observations()).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitError(_)));
    assert!(err.is_recoverable());
}
