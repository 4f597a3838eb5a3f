//! Lagged differencing

use crate::{MathError, Result};

/// Apply `times` rounds of lag-`lag` differencing: `x_t - x_{t-lag}`.
///
/// Each round shortens the series by `lag` observations.
pub fn difference(data: &[f64], lag: usize, times: usize) -> Result<Vec<f64>> {
    if lag == 0 {
        return Err(MathError::InvalidInput(
            "Differencing lag must be at least 1".to_string(),
        ));
    }

    let mut result = data.to_vec();
    for _ in 0..times {
        if result.len() <= lag {
            return Err(MathError::InsufficientData(format!(
                "Cannot difference {} observations at lag {}",
                result.len(),
                lag
            )));
        }
        result = (lag..result.len())
            .map(|i| result[i] - result[i - lag])
            .collect();
    }

    Ok(result)
}

/// Apply the combined operator `(1 - B)^d (1 - B^m)^D`.
pub fn seasonal_difference(data: &[f64], d: usize, seasonal_d: usize, period: usize) -> Result<Vec<f64>> {
    let once = difference(data, 1, d)?;
    if seasonal_d == 0 {
        return Ok(once);
    }
    difference(&once, period, seasonal_d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        let diffed = difference(&[1.0, 3.0, 6.0, 10.0, 15.0], 1, 1).unwrap();
        assert_eq!(diffed, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_second_difference() {
        let diffed = difference(&[1.0, 3.0, 6.0, 10.0, 15.0], 1, 2).unwrap();
        assert_eq!(diffed, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_seasonal_difference_length() {
        let data: Vec<f64> = (0..48).map(|i| i as f64).collect();
        let diffed = seasonal_difference(&data, 1, 1, 12).unwrap();
        assert_eq!(diffed.len(), 48 - 1 - 12);
        assert!(diffed.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_difference_too_short() {
        assert!(difference(&[1.0, 2.0], 3, 1).is_err());
        assert!(difference(&[1.0, 2.0], 0, 1).is_err());
    }
}
