use aerocast::data::{CachedProvider, FileCsvSource};
use aerocast::models::{ForecastModel, Sarima};
use aerocast::workflows::{run_forecast, train_and_evaluate};
use aerocast::{FittedModel, ModelOrder, SarimaSpec, SeasonalOrder};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load data from the bundled CSV
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("airline-passengers.csv");

    println!("Loading data from: {}", csv_path.display());
    let provider = CachedProvider::new(FileCsvSource::new(csv_path));
    let series = provider.load()?;
    println!("Loaded {} months", series.len());

    // Compare a few orders on an 80/20 split
    let candidates = [
        SarimaSpec::new(ModelOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12)),
        SarimaSpec::new(ModelOrder::new(0, 1, 1), SeasonalOrder::new(0, 1, 1, 12)),
        SarimaSpec::new(ModelOrder::new(2, 1, 0), SeasonalOrder::none()),
    ];
    for spec in candidates {
        match train_and_evaluate(&series, 80, spec) {
            Ok(report) => println!("{:<26} RMSE {:>8.2}", spec.to_string(), report.evaluation.rmse),
            Err(err) => println!("{:<26} failed: {}", spec.to_string(), err),
        }
    }

    // Fit the airline model on everything and forecast the next year
    let model = Sarima::new(SarimaSpec::default()).fit(series.observations())?;
    let forecast = run_forecast(Some(&model as &dyn FittedModel), 12)?;

    println!("\nForecast for the next 12 months using {}:", forecast.model);
    for row in &forecast.rows {
        println!(
            "{}: {:.1} [{:.1}, {:.1}]",
            row.month, row.predicted, row.lower, row.upper
        );
    }

    Ok(())
}
