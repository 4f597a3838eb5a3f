//! Monthly passenger series and the providers that load it

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Location of the classic 1949-1960 airline passenger dataset
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/jbrownlee/Datasets/master/airline-passengers.csv";

/// Column name given to the month field after loading
pub const MONTH_COLUMN: &str = "month";
/// Column name given to the count field after loading
pub const PASSENGERS_COLUMN: &str = "passengers";

/// A calendar month, stored as the first day of that month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    /// Create a month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or_else(|| ForecastError::ValidationError(format!("Invalid month {}-{}", year, month)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month number
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The month `n` months after this one
    pub fn add_months(&self, n: u32) -> Result<Month> {
        let index = self.year() as i64 * 12 + (self.month() as i64 - 1) + n as i64;
        let year = i32::try_from(index.div_euclid(12))
            .map_err(|_| ForecastError::ValidationError("Month out of range".to_string()))?;
        Month::new(year, index.rem_euclid(12) as u32 + 1)
    }

    /// The following month
    pub fn succ(&self) -> Result<Month> {
        self.add_months(1)
    }
}

impl FromStr for Month {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map(Month)
            .map_err(|e| ForecastError::ValidationError(format!("Invalid month '{}': {}", s, e)))
    }
}

impl TryFrom<String> for Month {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// One row of the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub month: Month,
    pub passengers: u64,
}

/// Ordered monthly passenger counts, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

/// Training prefix and test suffix of a series
#[derive(Debug, Clone, Copy)]
pub struct SplitResult<'a> {
    pub train: &'a [Observation],
    pub test: &'a [Observation],
}

impl<'a> SplitResult<'a> {
    pub fn train_size(&self) -> usize {
        self.train.len()
    }

    pub fn test_size(&self) -> usize {
        self.test.len()
    }
}

impl TimeSeries {
    /// Build a series, sorting by month. Repeated months are rejected.
    pub fn new(mut observations: Vec<Observation>) -> Result<Self> {
        observations.sort_by_key(|o| o.month);
        if let Some(pair) = observations.windows(2).find(|w| w[0].month == w[1].month) {
            return Err(ForecastError::ValidationError(format!(
                "Duplicate month {} in series",
                pair[0].month
            )));
        }
        Ok(Self { observations })
    }

    /// Build a series of consecutive months starting at `start`
    pub fn from_values(start: Month, values: &[u64]) -> Result<Self> {
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, &passengers)| {
                Ok(Observation {
                    month: start.add_months(i as u32)?,
                    passengers,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Passenger counts as floating point values, in month order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.passengers as f64).collect()
    }

    pub fn first_month(&self) -> Option<Month> {
        self.observations.first().map(|o| o.month)
    }

    pub fn last_month(&self) -> Option<Month> {
        self.observations.last().map(|o| o.month)
    }

    /// The first `n` rows, for previews
    pub fn head(&self, n: usize) -> &[Observation] {
        &self.observations[..n.min(self.len())]
    }

    /// Split into a training prefix of `floor(len * pct / 100)` rows and the remaining tail
    pub fn split(&self, pct: u32) -> Result<SplitResult<'_>> {
        if pct > 100 {
            return Err(ForecastError::InvalidParameter(format!(
                "Split percentage must be between 0 and 100, got {}",
                pct
            )));
        }
        let train_size = self.len() * pct as usize / 100;
        let (train, test) = self.observations.split_at(train_size);
        Ok(SplitResult { train, test })
    }
}

/// Parse the two-column month/passengers CSV.
///
/// Header names are ignored: the first column is taken as the month and the
/// second as the count, and both are renamed to the canonical column names.
pub fn parse_passenger_csv(bytes: Vec<u8>) -> Result<TimeSeries> {
    let mut df = CsvReader::new(Cursor::new(bytes))
        .infer_schema(None)
        .has_header(true)
        .finish()
        .map_err(|e| ForecastError::DataUnavailable(format!("Malformed CSV: {}", e)))?;

    if df.width() < 2 {
        return Err(ForecastError::DataUnavailable(format!(
            "Expected two columns (month, passengers), found {}",
            df.width()
        )));
    }

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    df.rename(&names[0], MONTH_COLUMN)?;
    df.rename(&names[1], PASSENGERS_COLUMN)?;

    let months = df.column(MONTH_COLUMN)?.cast(&DataType::Utf8)?;
    let counts = df.column(PASSENGERS_COLUMN)?;
    if !counts.dtype().is_integer() {
        return Err(ForecastError::DataUnavailable(format!(
            "Passenger counts must be integers, found column of type {}",
            counts.dtype()
        )));
    }
    let counts = counts.cast(&DataType::Int64)?;

    let mut observations = Vec::with_capacity(df.height());
    for (row, (month, count)) in months.utf8()?.into_iter().zip(counts.i64()?.into_iter()).enumerate() {
        let month = month
            .ok_or_else(|| ForecastError::DataUnavailable(format!("Missing month in row {}", row + 1)))?
            .parse::<Month>()
            .map_err(|e| ForecastError::DataUnavailable(format!("Row {}: {}", row + 1, e)))?;
        let passengers = match count {
            Some(value) if value >= 0 => value as u64,
            Some(value) => {
                return Err(ForecastError::DataUnavailable(format!(
                    "Negative passenger count {} for {}",
                    value, month
                )))
            }
            None => {
                return Err(ForecastError::DataUnavailable(format!(
                    "Missing passenger count for {}",
                    month
                )))
            }
        };
        observations.push(Observation { month, passengers });
    }

    if observations.is_empty() {
        return Err(ForecastError::DataUnavailable(
            "CSV contains no rows".to_string(),
        ));
    }

    TimeSeries::new(observations).map_err(|e| ForecastError::DataUnavailable(e.to_string()))
}

/// Somewhere a passenger series can be loaded from
pub trait SeriesSource: Send + Sync {
    /// Fetch and parse the series
    fn fetch(&self) -> Result<TimeSeries>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

impl<S: SeriesSource + ?Sized> SeriesSource for Box<S> {
    fn fetch(&self) -> Result<TimeSeries> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// CSV served over HTTP(S)
#[derive(Debug, Clone)]
pub struct RemoteCsvSource {
    url: String,
    timeout: Duration,
}

impl RemoteCsvSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RemoteCsvSource {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_URL)
    }
}

impl SeriesSource for RemoteCsvSource {
    fn fetch(&self) -> Result<TimeSeries> {
        info!(url = %self.url, "fetching passenger series");
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .get(&self.url)
            .call()
            .map_err(|e| ForecastError::DataUnavailable(format!("Failed to download {}: {}", self.url, e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| ForecastError::DataUnavailable(format!("Failed to read {}: {}", self.url, e)))?;
        debug!(bytes = bytes.len(), "downloaded passenger CSV");

        parse_passenger_csv(bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// CSV on the local filesystem
#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SeriesSource for FileCsvSource {
    fn fetch(&self) -> Result<TimeSeries> {
        info!(path = %self.path.display(), "reading passenger series");
        let bytes = std::fs::read(&self.path).map_err(|e| {
            ForecastError::DataUnavailable(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        parse_passenger_csv(bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads the series once and hands out the cached copy afterwards.
///
/// The lock is held while the first fetch runs, so concurrent first callers
/// wait for that fetch instead of starting their own. A failed fetch leaves
/// the cache empty and the next call tries again.
pub struct CachedProvider<S: SeriesSource> {
    source: S,
    cache: Mutex<Option<Arc<TimeSeries>>>,
}

impl<S: SeriesSource> CachedProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// Return the series, fetching it on first use
    pub fn load(&self) -> Result<Arc<TimeSeries>> {
        let mut guard = self
            .cache
            .lock()
            .map_err(|_| ForecastError::DataUnavailable("Series cache lock poisoned".to_string()))?;

        if let Some(series) = guard.as_ref() {
            debug!(source = %self.source.describe(), "serving cached series");
            return Ok(Arc::clone(series));
        }

        let series = Arc::new(self.source.fetch()?);
        info!(
            source = %self.source.describe(),
            rows = series.len(),
            "passenger series loaded"
        );
        *guard = Some(Arc::clone(&series));
        Ok(series)
    }

    /// Whether a series has been cached
    pub fn is_loaded(&self) -> bool {
        self.cache.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
