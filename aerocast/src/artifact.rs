//! Persisted model artifacts
//!
//! A fitted model is stored as JSON holding its specification, coefficients
//! and the observations it was fitted on. Loading recomputes residuals from
//! that history, so the file stays small and human-readable.

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::models::{FittedSarima, SarimaParams, SarimaSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Version written by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// On-disk form of a fitted seasonal ARIMA
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub spec: SarimaSpec,
    pub params: SarimaParams,
    pub confidence_level: f64,
    pub iterations: usize,
    pub converged: bool,
    pub history: Vec<Observation>,
}

impl From<&FittedSarima> for ModelArtifact {
    fn from(model: &FittedSarima) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            spec: *model.spec(),
            params: model.params().clone(),
            confidence_level: model.confidence_level(),
            iterations: model.diagnostics().iterations,
            converged: model.diagnostics().converged,
            history: model.history().to_vec(),
        }
    }
}

impl ModelArtifact {
    /// Rebuild the fitted model
    pub fn into_model(self) -> Result<FittedSarima> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ForecastError::ModelUnavailable(format!(
                "Unsupported artifact format version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        FittedSarima::from_parts(self.spec, self.params, self.history)
            .and_then(|model| model.with_confidence_level(self.confidence_level))
            .map(|model| model.with_fit_record(self.iterations, self.converged))
            .map_err(|e| ForecastError::ModelUnavailable(format!("Artifact is inconsistent: {}", e)))
    }
}

/// Write `model` to `path` as JSON, creating parent directories
pub fn save_model<P: AsRef<Path>>(model: &FittedSarima, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&ModelArtifact::from(model))?;
    fs::write(path, json)?;
    info!(path = %path.display(), model = %model.spec(), "model artifact saved");
    Ok(())
}

/// Load a model, reporting why it is unavailable
pub fn try_load_model<P: AsRef<Path>>(path: P) -> Result<FittedSarima> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ForecastError::ModelUnavailable(format!(
            "Model file not found: {}",
            path.display()
        )));
    }
    let json = fs::read_to_string(path).map_err(|e| {
        ForecastError::ModelUnavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let artifact: ModelArtifact = serde_json::from_str(&json).map_err(|e| {
        ForecastError::ModelUnavailable(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    let model = artifact.into_model()?;
    info!(
        path = %path.display(),
        model = %model.spec(),
        observations = model.history().len(),
        "model artifact loaded"
    );
    Ok(model)
}

/// Load a model, or `None` when no usable artifact exists at `path`
pub fn load_model<P: AsRef<Path>>(path: P) -> Option<FittedSarima> {
    match try_load_model(path) {
        Ok(model) => Some(model),
        Err(err) => {
            warn!(error = %err, "no pre-trained model available");
            None
        }
    }
}
