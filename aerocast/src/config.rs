//! Application configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command line flags are applied on top by the binary.

use crate::data::DEFAULT_DATA_URL;
use crate::error::{ForecastError, Result};
use crate::models::sarima::DEFAULT_CONFIDENCE_LEVEL;
use crate::models::SarimaSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the model artifact used by the forecast workflow
pub const DEFAULT_MODEL_PATH: &str = "models/sarima_airline.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV served over HTTP(S)
    pub data_url: String,
    /// Local CSV used instead of `data_url` when set
    pub data_file: Option<PathBuf>,
    /// Network timeout for the remote fetch
    pub fetch_timeout_secs: u64,
    /// Artifact read by `forecast` and written by `fit`
    pub model_path: PathBuf,
    /// Interval coverage for forecasts
    pub confidence_level: f64,
    /// Training share used when `--split` is not given
    pub split_pct: u32,
    /// Orders used when none are given on the command line
    pub spec: SarimaSpec,
    /// Forecast length used when `--horizon` is not given
    pub horizon: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            data_file: None,
            fetch_timeout_secs: 30,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            split_pct: 80,
            spec: SarimaSpec::default(),
            horizon: 12,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        config.validate()?;
        Ok(config)
    }

    /// Config from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if self.split_pct > 100 {
            return Err(ForecastError::InvalidParameter(format!(
                "split_pct must be at most 100, got {}",
                self.split_pct
            )));
        }
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "split_pct": 90, "model_path": "elsewhere.json" }}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.split_pct, 90);
        assert_eq!(config.model_path, PathBuf::from("elsewhere.json"));
        assert_eq!(config.horizon, 12);
        assert_eq!(config.data_url, DEFAULT_DATA_URL);
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "confidence_level": 1.5 }}"#).unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
