//! Seasonal ARIMA estimated by conditional sum of squares
//!
//! The model is
//!
//! ```text
//! phi(B) Phi(B^m) (1 - B)^d (1 - B^m)^D y_t = theta(B) Theta(B^m) e_t
//! ```
//!
//! with no trend term. The ARMA coefficients are found by minimizing the sum
//! of squared one-step residuals with a Nelder-Mead simplex. The AR and MA
//! blocks are searched in an unconstrained space and mapped into the
//! stationary / invertible region, so every candidate is a valid model.
//!
//! The differencing operator is folded into the autoregressive polynomial,
//! which lets residuals, fitted values and forecasts all run on the original
//! level series.

use crate::data::{Month, Observation};
use crate::error::{ForecastError, Result};
use crate::models::{FittedModel, ForecastModel, ForecastTable, SarimaSpec};
use aerocast_math::polynomial::psi_weights;
use aerocast_math::transforms::{constrain_invertible, constrain_stationary};
use aerocast_math::{differencing, LagPolynomial, NelderMead};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;
use tracing::{debug, info, warn};

/// Confidence level used when none is configured
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Estimated ARMA coefficients, in the sign convention of
/// `1 - phi_1 B - ...` (AR) and `1 + theta_1 B + ...` (MA)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarimaParams {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaParams {
    /// Map an unconstrained search point onto valid coefficients
    fn from_unconstrained(spec: &SarimaSpec, x: &[f64]) -> Self {
        let (ar, rest) = x.split_at(spec.order.p);
        let (ma, rest) = rest.split_at(spec.order.q);
        let (seasonal_ar, seasonal_ma) = rest.split_at(spec.seasonal_order.p);
        Self {
            ar: constrain_stationary(ar),
            ma: constrain_invertible(ma),
            seasonal_ar: constrain_stationary(seasonal_ar),
            seasonal_ma: constrain_invertible(seasonal_ma),
        }
    }

    /// Whether the coefficient counts agree with `spec`
    pub fn matches(&self, spec: &SarimaSpec) -> bool {
        self.ar.len() == spec.order.p
            && self.ma.len() == spec.order.q
            && self.seasonal_ar.len() == spec.seasonal_order.p
            && self.seasonal_ma.len() == spec.seasonal_order.q
    }

    /// `phi(B) Phi(B^m) (1 - B)^d (1 - B^m)^D`
    fn integrated_ar_polynomial(&self, spec: &SarimaSpec) -> LagPolynomial {
        let m = spec.seasonal_order.m;
        LagPolynomial::autoregressive(&self.ar, 1)
            .multiply(&LagPolynomial::autoregressive(&self.seasonal_ar, m))
            .multiply(&LagPolynomial::differencing(
                spec.order.d,
                spec.seasonal_order.d,
                m,
            ))
    }

    /// `theta(B) Theta(B^m)`
    fn ma_polynomial(&self, spec: &SarimaSpec) -> LagPolynomial {
        LagPolynomial::moving_average(&self.ma, 1)
            .multiply(&LagPolynomial::moving_average(&self.seasonal_ma, spec.seasonal_order.m))
    }
}

/// Summary statistics of an estimation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    /// Sum of squared residuals
    pub sse: f64,
    /// Residual variance
    pub sigma2: f64,
    /// Gaussian log-likelihood of the residuals
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Residuals that entered the objective
    pub n_residuals: usize,
    pub iterations: usize,
    pub converged: bool,
}

/// Unfitted seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct Sarima {
    spec: SarimaSpec,
    optimizer: NelderMead,
    confidence_level: f64,
}

impl Sarima {
    pub fn new(spec: SarimaSpec) -> Self {
        Self {
            spec,
            optimizer: NelderMead::default(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }

    /// Use a different simplex configuration
    pub fn with_optimizer(mut self, optimizer: NelderMead) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Interval coverage for forecasts of the fitted model
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        validate_confidence_level(level)?;
        self.confidence_level = level;
        Ok(self)
    }

    pub fn spec(&self) -> &SarimaSpec {
        &self.spec
    }

    /// Reject specifications the estimator cannot represent.
    ///
    /// This mirrors the estimator's own errors and deliberately says nothing
    /// about whether a valid specification will fit the data well.
    pub fn check_spec(spec: &SarimaSpec) -> Result<()> {
        let seasonal = spec.seasonal_order;
        if seasonal.is_seasonal() && seasonal.m < 2 {
            return Err(ForecastError::ModelFitError(
                "Seasonal periodicity must be greater than 1.".to_string(),
            ));
        }
        if seasonal.p > 0 && spec.order.p >= seasonal.m {
            let lags = overlapping_lags(spec.order.p, seasonal.p, seasonal.m);
            return Err(ForecastError::ModelFitError(format!(
                "Invalid model: autoregressive lag(s) {:?} are in both the seasonal and non-seasonal autoregressive components.",
                lags
            )));
        }
        if seasonal.q > 0 && spec.order.q >= seasonal.m {
            let lags = overlapping_lags(spec.order.q, seasonal.q, seasonal.m);
            return Err(ForecastError::ModelFitError(format!(
                "Invalid model: moving average lag(s) {:?} are in both the seasonal and non-seasonal moving average components.",
                lags
            )));
        }
        Ok(())
    }
}

impl ForecastModel for Sarima {
    type Fitted = FittedSarima;

    fn fit(&self, data: &[Observation]) -> Result<FittedSarima> {
        let spec = self.spec;
        Self::check_spec(&spec)?;

        let values: Vec<f64> = data.iter().map(|o| o.passengers as f64).collect();
        let stationary = differencing::seasonal_difference(
            &values,
            spec.order.d,
            spec.seasonal_order.d,
            spec.seasonal_order.m.max(1),
        )
        .map_err(|e| {
            ForecastError::ModelFitError(format!(
                "{} cannot be differenced with {} observations: {}",
                spec,
                values.len(),
                e
            ))
        })?;

        let warmup = spec.max_ar_lag();
        if values.len() <= warmup {
            return Err(ForecastError::ModelFitError(format!(
                "{} needs more than {} observations, got {}",
                spec,
                warmup,
                values.len()
            )));
        }

        info!(
            model = %spec,
            observations = values.len(),
            differenced = stationary.len(),
            "fitting seasonal ARIMA"
        );

        let start = vec![0.0; spec.n_params()];
        let minimum = self.optimizer.minimize(
            |x| {
                let params = SarimaParams::from_unconstrained(&spec, x);
                let ar = params.integrated_ar_polynomial(&spec);
                let ma = params.ma_polynomial(&spec);
                let residuals = conditional_residuals(&values, &ar, &ma);
                residuals[warmup..].iter().map(|e| e * e).sum()
            },
            &start,
        )?;

        if !minimum.converged {
            warn!(
                model = %spec,
                iterations = minimum.iterations,
                "maximum likelihood optimization failed to converge"
            );
        }
        debug!(iterations = minimum.iterations, sse = minimum.value, "optimizer finished");

        let params = SarimaParams::from_unconstrained(&spec, &minimum.point);
        let mut fitted = FittedSarima::from_parts(spec, params, data.to_vec())?;
        fitted.diagnostics.iterations = minimum.iterations;
        fitted.diagnostics.converged = minimum.converged;
        fitted.confidence_level = self.confidence_level;
        Ok(fitted)
    }

    fn name(&self) -> String {
        self.spec.to_string()
    }
}

/// Seasonal ARIMA with estimated coefficients and the sample it was fitted on
#[derive(Debug, Clone)]
pub struct FittedSarima {
    spec: SarimaSpec,
    params: SarimaParams,
    history: Vec<Observation>,
    diagnostics: FitDiagnostics,
    confidence_level: f64,
    values: Vec<f64>,
    residuals: Vec<f64>,
    ar: LagPolynomial,
    ma: LagPolynomial,
}

impl FittedSarima {
    /// Rebuild a fitted model from its coefficients and history.
    ///
    /// Residuals and the residual variance are recomputed from the data.
    pub fn from_parts(spec: SarimaSpec, params: SarimaParams, history: Vec<Observation>) -> Result<Self> {
        Sarima::check_spec(&spec)?;
        if !params.matches(&spec) {
            return Err(ForecastError::ValidationError(format!(
                "Coefficient counts do not match {}",
                spec
            )));
        }

        let warmup = spec.max_ar_lag();
        if history.len() <= warmup {
            return Err(ForecastError::ModelFitError(format!(
                "{} needs more than {} observations, got {}",
                spec,
                warmup,
                history.len()
            )));
        }
        if let Some(pair) = history.windows(2).find(|w| w[0].month >= w[1].month) {
            return Err(ForecastError::ValidationError(format!(
                "History months must be strictly increasing, found {} followed by {}",
                pair[0].month, pair[1].month
            )));
        }

        let values: Vec<f64> = history.iter().map(|o| o.passengers as f64).collect();
        let ar = params.integrated_ar_polynomial(&spec);
        let ma = params.ma_polynomial(&spec);
        let residuals = conditional_residuals(&values, &ar, &ma);

        let n_residuals = values.len() - warmup;
        let sse: f64 = residuals[warmup..].iter().map(|e| e * e).sum();
        if !sse.is_finite() {
            return Err(ForecastError::ModelFitError(format!(
                "{} produced non-finite residuals",
                spec
            )));
        }

        let sigma2 = sse / n_residuals as f64;
        let n = n_residuals as f64;
        let log_likelihood = if sigma2 > 0.0 {
            -0.5 * n * ((2.0 * PI * sigma2).ln() + 1.0)
        } else {
            f64::INFINITY
        };
        let k = (spec.n_params() + 1) as f64;

        Ok(Self {
            spec,
            params,
            history,
            diagnostics: FitDiagnostics {
                sse,
                sigma2,
                log_likelihood,
                aic: -2.0 * log_likelihood + 2.0 * k,
                bic: -2.0 * log_likelihood + k * n.ln(),
                n_residuals,
                iterations: 0,
                converged: true,
            },
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            values,
            residuals,
            ar,
            ma,
        })
    }

    /// Replace the interval coverage used by `get_forecast`
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        validate_confidence_level(level)?;
        self.confidence_level = level;
        Ok(self)
    }

    /// Restore convergence details recorded when the model was estimated
    pub fn with_fit_record(mut self, iterations: usize, converged: bool) -> Self {
        self.diagnostics.iterations = iterations;
        self.diagnostics.converged = converged;
        self
    }

    pub fn spec(&self) -> &SarimaSpec {
        &self.spec
    }

    pub fn params(&self) -> &SarimaParams {
        &self.params
    }

    pub fn history(&self) -> &[Observation] {
        &self.history
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// One-step-ahead fitted values over the sample.
    ///
    /// The first observations have no residual under the conditional
    /// likelihood and are returned unchanged.
    fn fitted_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .zip(&self.residuals)
            .map(|(y, e)| y - e)
            .collect()
    }

    /// Dynamic forecasts for the `steps` periods after the sample
    fn forecast_path(&self, steps: usize) -> Vec<f64> {
        let n = self.values.len();
        let mut levels = self.values.clone();
        levels.reserve(steps);

        for t in n..n + steps {
            let mut value = 0.0;
            for i in 1..=self.ar.degree() {
                value -= self.ar.coefficient(i) * levels[t - i];
            }
            for j in (t + 1 - n)..=self.ma.degree().min(t) {
                value += self.ma.coefficient(j) * self.residuals[t - j];
            }
            levels.push(value);
        }

        levels.split_off(n)
    }
}

impl FittedModel for FittedSarima {
    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        if end < start {
            return Err(ForecastError::InvalidParameter(format!(
                "Prediction end ({}) is before start ({})",
                end, start
            )));
        }

        let n = self.values.len();
        let in_sample = self.fitted_values();
        let out_of_sample = if end >= n {
            self.forecast_path(end + 1 - n)
        } else {
            Vec::new()
        };

        Ok((start..=end)
            .map(|i| if i < n { in_sample[i] } else { out_of_sample[i - n] })
            .collect())
    }

    fn get_forecast(&self, steps: usize) -> Result<ForecastTable> {
        if steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let mean = self.forecast_path(steps);
        let z = normal_quantile(self.confidence_level)?;
        let psi = psi_weights(&self.ar, &self.ma, steps);

        let mut lower = Vec::with_capacity(steps);
        let mut upper = Vec::with_capacity(steps);
        let mut cumulative = 0.0;
        for (value, weight) in mean.iter().zip(&psi) {
            cumulative += weight * weight;
            let half_width = z * (self.diagnostics.sigma2 * cumulative).sqrt();
            lower.push(value - half_width);
            upper.push(value + half_width);
        }

        ForecastTable::new(mean, lower, upper, self.confidence_level)
    }

    fn end_month(&self) -> Month {
        // from_parts guarantees a non-empty history
        self.history[self.history.len() - 1].month
    }

    fn n_observations(&self) -> usize {
        self.history.len()
    }

    fn name(&self) -> String {
        self.spec.to_string()
    }
}

/// Residuals of `ar(B) y_t = ma(B) e_t` with residuals before the AR
/// warm-up fixed at zero.
fn conditional_residuals(values: &[f64], ar: &LagPolynomial, ma: &LagPolynomial) -> Vec<f64> {
    let warmup = ar.degree();
    let mut residuals = vec![0.0; values.len()];
    for t in warmup..values.len() {
        let mut e = values[t];
        for i in 1..=warmup {
            e += ar.coefficient(i) * values[t - i];
        }
        for j in 1..=ma.degree().min(t) {
            e -= ma.coefficient(j) * residuals[t - j];
        }
        residuals[t] = e;
    }
    residuals
}

fn overlapping_lags(order: usize, seasonal_order: usize, period: usize) -> Vec<usize> {
    (1..=seasonal_order)
        .map(|k| k * period)
        .filter(|lag| *lag <= order)
        .collect()
}

fn validate_confidence_level(level: f64) -> Result<()> {
    if level <= 0.0 || level >= 1.0 || level.is_nan() {
        return Err(ForecastError::InvalidParameter(format!(
            "Confidence level must be between 0 and 1, got {}",
            level
        )));
    }
    Ok(())
}

/// Two-sided standard normal quantile for `level`
fn normal_quantile(level: f64) -> Result<f64> {
    validate_confidence_level(level)?;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ValidationError(e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - level) / 2.0))
}
