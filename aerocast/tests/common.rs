#![allow(dead_code)]

use aerocast::data::{FileCsvSource, SeriesSource};
use aerocast::TimeSeries;
use std::path::PathBuf;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("airline-passengers.csv")
}

/// The 144-month airline passenger series, 1949-01 to 1960-12
pub fn airline_series() -> TimeSeries {
    FileCsvSource::new(fixture_path()).fetch().unwrap()
}
