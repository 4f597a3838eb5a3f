use aerocast::metrics::{forecast_accuracy, rmse};
use assert_approx_eq::assert_approx_eq;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    assert_approx_eq!(rmse(&actual, &predicted).unwrap(), 6f64.sqrt(), 1e-12);

    let accuracy = forecast_accuracy(&actual, &predicted).unwrap();
    assert_approx_eq!(accuracy.mae, 2.4, 1e-12);
    assert_approx_eq!(accuracy.mse, 6.0, 1e-12);
    assert_approx_eq!(accuracy.rmse, 6f64.sqrt(), 1e-12);
    assert!(accuracy.mape > 0.0 && accuracy.mape < 15.0);
    assert!(accuracy.smape > 0.0 && accuracy.smape < 15.0);
}

#[test]
fn test_rmse_zero_only_for_exact_match() {
    let actual = vec![112.0, 118.0, 132.0];
    assert_eq!(rmse(&actual, &actual).unwrap(), 0.0);

    let nudged = vec![112.0, 118.0, 132.5];
    assert!(rmse(&actual, &nudged).unwrap() > 0.0);
}

#[test]
fn test_error_handling() {
    let empty: Vec<f64> = vec![];
    assert!(rmse(&empty, &empty).is_err());
    assert!(rmse(&[1.0, 2.0], &[1.0]).is_err());
    assert!(forecast_accuracy(&[1.0], &[]).is_err());
}
