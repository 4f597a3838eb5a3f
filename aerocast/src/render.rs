//! Text, CSV and JSON rendering of workflow outputs

use crate::data::{Observation, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::workflows::{ForecastResult, TrainingReport};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line chart of `values`, averaged down to at most `width` cells
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let cells = width.min(values.len());
    let buckets: Vec<f64> = (0..cells)
        .map(|i| {
            let from = i * values.len() / cells;
            let to = ((i + 1) * values.len() / cells).max(from + 1);
            values[from..to].iter().sum::<f64>() / (to - from) as f64
        })
        .collect();

    let min = buckets.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    buckets
        .iter()
        .map(|v| {
            let level = if range > 0.0 {
                (((v - min) / range) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Overview of the loaded series with a sparkline
pub fn render_history(series: &TimeSeries, width: usize) -> String {
    let mut out = String::new();
    match (series.first_month(), series.last_month()) {
        (Some(first), Some(last)) => {
            let values = series.values();
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let _ = writeln!(
                out,
                "Monthly airline passengers {} .. {} ({} months)",
                first,
                last,
                series.len()
            );
            let _ = writeln!(out, "min {:.0}  max {:.0}", min, max);
            let _ = writeln!(out, "{}", sparkline(&values, width));
        }
        _ => {
            let _ = writeln!(out, "Series is empty");
        }
    }
    out
}

/// Table of raw rows
pub fn render_observations(rows: &[Observation]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:>10}", "Month", "Passengers");
    for row in rows {
        let _ = writeln!(out, "{:<8} {:>10}", row.month, row.passengers);
    }
    out
}

/// RMSE metric, split note, and the actual-vs-predicted table
pub fn render_training_report(report: &TrainingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model: {}", report.model);
    let _ = writeln!(
        out,
        "Root Mean Squared Error (RMSE): {:.2}",
        report.evaluation.rmse
    );
    let _ = writeln!(
        out,
        "Model trained with {}% of the data ({} train / {} test months).",
        report.split_pct, report.train_size, report.test_size
    );
    let _ = writeln!(
        out,
        "MAE {:.2}  MAPE {:.2}%  AIC {:.2}",
        report.accuracy.mae, report.accuracy.mape, report.diagnostics.aic
    );
    if !report.diagnostics.converged {
        let _ = writeln!(
            out,
            "Warning: the optimizer stopped after {} iterations without converging.",
            report.diagnostics.iterations
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<8} {:>10} {:>12}", "Month", "Actual", "Predicted");
    for row in &report.evaluation.rows {
        let _ = writeln!(
            out,
            "{:<8} {:>10.0} {:>12.2}",
            row.month, row.actual, row.predicted
        );
    }
    out
}

/// Forecast table with interval bounds
pub fn render_forecast(result: &ForecastResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Forecast from {} for {} months ({:.0}% interval)",
        result.model,
        result.horizon(),
        result.confidence_level * 100.0
    );
    let _ = writeln!(
        out,
        "{:<8} {:>12} {:>12} {:>12}",
        "Month", "Predicted", "Lower", "Upper"
    );
    for row in &result.rows {
        let _ = writeln!(
            out,
            "{:<8} {:>12.2} {:>12.2} {:>12.2}",
            row.month, row.predicted, row.lower, row.upper
        );
    }
    out
}

/// User-facing message for a workflow failure
pub fn render_error(err: &ForecastError) -> String {
    let mut out = match err {
        ForecastError::ModelFitError(_) => format!("An error occurred while training the model: {}", err),
        ForecastError::ModelUnavailable(_) => format!("Pre-trained model not found: {}", err),
        _ => format!("Error: {}", err),
    };
    if let Some(hint) = err.suggestion() {
        out.push('\n');
        out.push_str(hint);
    }
    out
}

/// Write the comparison table as CSV
pub fn write_comparison_csv<W: Write>(report: &TrainingReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["month", "actual", "predicted"])?;
    for row in &report.evaluation.rows {
        csv_writer.write_record([
            row.month.to_string(),
            format!("{}", row.actual),
            format!("{:.4}", row.predicted),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the forecast table as CSV
pub fn write_forecast_csv<W: Write>(result: &ForecastResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["month", "predicted", "lower", "upper"])?;
    for row in &result.rows {
        csv_writer.write_record([
            row.month.to_string(),
            format!("{:.4}", row.predicted),
            format!("{:.4}", row.lower),
            format!("{:.4}", row.upper),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Create `path` and hand it to `write`
pub fn export_to<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(File) -> Result<()>,
{
    let file = File::create(path)?;
    write(file)
}

/// Pretty JSON for any report
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
