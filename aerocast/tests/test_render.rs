mod common;

use aerocast::render::{render_forecast, render_training_report, write_comparison_csv, write_forecast_csv};
use aerocast::workflows::{run_forecast, train_and_evaluate};
use aerocast::models::{ForecastModel, Sarima};
use aerocast::{FittedModel, SarimaSpec};

#[test]
fn test_training_report_text_and_csv() {
    let series = common::airline_series();
    let report = train_and_evaluate(&series, 80, SarimaSpec::default()).unwrap();

    let text = render_training_report(&report);
    assert!(text.contains("Root Mean Squared Error (RMSE)"));
    assert!(text.contains("80% of the data"));
    assert!(text.contains("1958-08"));

    let mut buffer = Vec::new();
    write_comparison_csv(&report, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "month,actual,predicted");
    assert_eq!(lines.len(), 30);
    assert!(lines[1].starts_with("1958-08,505,"));
}

#[test]
fn test_forecast_table_text_and_csv() {
    let series = common::airline_series();
    let fitted = Sarima::new(SarimaSpec::default()).fit(series.observations()).unwrap();
    let result = run_forecast(Some(&fitted as &dyn FittedModel), 3).unwrap();

    let text = render_forecast(&result);
    assert!(text.contains("95% interval"));
    assert!(text.contains("1961-03"));

    let mut buffer = Vec::new();
    write_forecast_csv(&result, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("month,predicted,lower,upper\n1961-01,"));
}
