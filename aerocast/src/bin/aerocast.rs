//! aerocast CLI: train/evaluate SARIMA orders and forecast from a saved model.

use aerocast::artifact::load_model;
use aerocast::data::{CachedProvider, FileCsvSource, RemoteCsvSource, SeriesSource};
use aerocast::models::{ForecastModel, Sarima};
use aerocast::render::{
    export_to, render_error, render_forecast, render_history, render_observations,
    render_training_report, to_json, write_comparison_csv, write_forecast_csv,
};
use aerocast::workflows::{fit_and_save, run_forecast, train_and_evaluate_with};
use aerocast::{AppConfig, FittedModel, ForecastError, ModelOrder, SarimaSpec, SeasonalOrder, TimeSeries};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CHART_WIDTH: usize = 72;

#[derive(Parser)]
#[command(name = "aerocast")]
#[command(author, version)]
#[command(about = "Try SARIMA orders on the airline passenger series and forecast from a saved model")]
#[command(long_about = "aerocast: seasonal ARIMA experiments on monthly airline passenger counts.

EXAMPLES:
  # Show the series and its first rows
  aerocast data

  # Train on 80% of the data with SARIMA(1,1,1)(1,1,1,12) and score the rest
  aerocast train --split 80 -p 1 -d 1 -q 1 -P 1 -D 1 -Q 1 -m 12

  # Fit on the full series and save the model artifact
  aerocast fit --model models/sarima_airline.json

  # Forecast 24 months ahead from the saved model
  aerocast forecast --horizon 24")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Read the series from a local CSV instead of the network
    #[arg(long, value_name = "CSV", global = true)]
    data_file: Option<PathBuf>,

    /// URL of the passenger CSV
    #[arg(long, value_name = "URL", global = true)]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the passenger series and its first rows
    Data {
        /// Number of raw rows to show
        #[arg(long, default_value_t = 5)]
        head: usize,
    },
    /// Train on a prefix of the series and evaluate on the rest
    Train {
        /// Percentage of the series used for training
        #[arg(long, value_parser = clap::value_parser!(u32).range(50..=95))]
        split: Option<u32>,

        #[command(flatten)]
        orders: OrderArgs,

        /// Write the actual-vs-predicted table to a CSV file
        #[arg(long, value_name = "CSV")]
        export: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fit on the full series and save the model artifact
    Fit {
        #[command(flatten)]
        orders: OrderArgs,

        /// Where to write the artifact
        #[arg(long, value_name = "PATH")]
        model: Option<PathBuf>,
    },
    /// Forecast from a saved model artifact
    Forecast {
        /// Months to forecast
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=48))]
        horizon: Option<u64>,

        /// Model artifact to load
        #[arg(long, value_name = "PATH")]
        model: Option<PathBuf>,

        /// Write the forecast table to a CSV file
        #[arg(long, value_name = "CSV")]
        export: Option<PathBuf>,

        /// Print the forecast as JSON
        #[arg(long)]
        json: bool,
    },
}

/// SARIMA orders; unset values fall back to the configuration
#[derive(Args)]
struct OrderArgs {
    /// AR order
    #[arg(short = 'p', value_parser = clap::value_parser!(u64).range(0..=5))]
    p: Option<u64>,
    /// Differencing order
    #[arg(short = 'd', value_parser = clap::value_parser!(u64).range(0..=5))]
    d: Option<u64>,
    /// MA order
    #[arg(short = 'q', value_parser = clap::value_parser!(u64).range(0..=5))]
    q: Option<u64>,
    /// Seasonal AR order
    #[arg(short = 'P', value_parser = clap::value_parser!(u64).range(0..=5))]
    seasonal_p: Option<u64>,
    /// Seasonal differencing order
    #[arg(short = 'D', value_parser = clap::value_parser!(u64).range(0..=5))]
    seasonal_d: Option<u64>,
    /// Seasonal MA order
    #[arg(short = 'Q', value_parser = clap::value_parser!(u64).range(0..=5))]
    seasonal_q: Option<u64>,
    /// Season length, usually 12 for monthly data
    #[arg(short = 'm', value_parser = clap::value_parser!(u64).range(1..=24))]
    period: Option<u64>,
}

impl OrderArgs {
    fn resolve(&self, defaults: &SarimaSpec) -> SarimaSpec {
        let pick = |arg: Option<u64>, default: usize| arg.map(|v| v as usize).unwrap_or(default);
        SarimaSpec::new(
            ModelOrder::new(
                pick(self.p, defaults.order.p),
                pick(self.d, defaults.order.d),
                pick(self.q, defaults.order.q),
            ),
            SeasonalOrder::new(
                pick(self.seasonal_p, defaults.seasonal_order.p),
                pick(self.seasonal_d, defaults.seasonal_order.d),
                pick(self.seasonal_q, defaults.seasonal_order.q),
                pick(self.period, defaults.seasonal_order.m),
            ),
        )
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();
}

fn build_provider(config: &AppConfig) -> CachedProvider<Box<dyn SeriesSource>> {
    let source: Box<dyn SeriesSource> = match &config.data_file {
        Some(path) => Box::new(FileCsvSource::new(path)),
        None => Box::new(
            RemoteCsvSource::new(config.data_url.clone())
                .with_timeout(Duration::from_secs(config.fetch_timeout_secs)),
        ),
    };
    CachedProvider::new(source)
}

/// Workflow failures are reported here and never escape as a panic
fn report_failure(err: &ForecastError) -> ExitCode {
    eprintln!("{}", render_error(err));
    if err.is_recoverable() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: Cli, config: AppConfig) -> std::result::Result<(), ForecastError> {
    let provider = build_provider(&config);

    match cli.command {
        Commands::Data { head } => {
            let series = provider.load()?;
            print!("{}", render_history(&series, CHART_WIDTH));
            println!();
            print!("{}", render_observations(series.head(head)));
        }
        Commands::Train {
            split,
            orders,
            export,
            json,
        } => {
            let series = provider.load()?;
            let split = split.unwrap_or(config.split_pct);
            let spec = orders.resolve(&config.spec);
            debug!(%spec, split, "train command");

            let model = Sarima::new(spec).with_confidence_level(config.confidence_level)?;
            let report = train_and_evaluate_with(&series, split, &model)?;

            if json {
                println!("{}", to_json(&report)?);
            } else {
                print!("{}", render_history(&series, CHART_WIDTH));
                println!();
                print!("{}", render_training_report(&report));
            }
            if let Some(path) = export {
                export_to(&path, |file| write_comparison_csv(&report, file))?;
                eprintln!("Comparison table written to {}", path.display());
            }
        }
        Commands::Fit { orders, model } => {
            let series = provider.load()?;
            let spec = orders.resolve(&config.spec);
            let path = model.unwrap_or_else(|| config.model_path.clone());

            let estimator = Sarima::new(spec).with_confidence_level(config.confidence_level)?;
            let fitted = fit_and_save(&series, &estimator, &path)?;
            let diagnostics = fitted.diagnostics();
            println!("Saved {} to {}", estimator.name(), path.display());
            println!(
                "observations {}  sigma2 {:.4}  log-likelihood {:.2}  AIC {:.2}  BIC {:.2}",
                fitted.n_observations(),
                diagnostics.sigma2,
                diagnostics.log_likelihood,
                diagnostics.aic,
                diagnostics.bic
            );
            let params = fitted.params();
            println!(
                "ar {:?}  ma {:?}  seasonal ar {:?}  seasonal ma {:?}",
                params.ar, params.ma, params.seasonal_ar, params.seasonal_ma
            );
        }
        Commands::Forecast {
            horizon,
            model,
            export,
            json,
        } => {
            let path = model.unwrap_or_else(|| config.model_path.clone());
            let horizon = horizon.map(|h| h as usize).unwrap_or(config.horizon);

            let loaded = load_model(&path);
            let result = run_forecast(loaded.as_ref().map(|m| m as &dyn FittedModel), horizon)?;

            if json {
                println!("{}", to_json(&result)?);
            } else {
                if let Some(model) = &loaded {
                    let history = TimeSeries::new(model.history().to_vec())?;
                    print!("{}", render_history(&history, CHART_WIDTH));
                    println!();
                }
                print!("{}", render_forecast(&result));
            }
            if let Some(path) = export {
                export_to(&path, |file| write_forecast_csv(&result, file))?;
                eprintln!("Forecast table written to {}", path.display());
            }
        }
    }

    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
    if let Some(path) = &cli.data_file {
        config.data_file = Some(path.clone());
    }
    if let Some(url) = &cli.data_url {
        config.data_url = url.clone();
    }

    match run(cli, config) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => Ok(report_failure(&err)),
    }
}
