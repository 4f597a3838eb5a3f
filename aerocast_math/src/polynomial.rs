//! Lag polynomials in the backshift operator `B`
//!
//! A polynomial is stored as its coefficient vector indexed by lag, so
//! `coefficients[k]` multiplies `B^k`. The constant term is always `1.0`
//! for the polynomials built here.

use serde::{Deserialize, Serialize};

/// Polynomial in the backshift operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagPolynomial {
    coefficients: Vec<f64>,
}

impl LagPolynomial {
    /// The identity polynomial `1`
    pub fn one() -> Self {
        Self {
            coefficients: vec![1.0],
        }
    }

    /// Build a polynomial from raw coefficients, lag 0 first
    pub fn from_coefficients(coefficients: Vec<f64>) -> Self {
        if coefficients.is_empty() {
            return Self::one();
        }
        Self { coefficients }
    }

    /// Autoregressive factor `1 - phi_1 B^s - phi_2 B^{2s} - ...`
    pub fn autoregressive(phi: &[f64], spacing: usize) -> Self {
        Self::spaced(phi, spacing, -1.0)
    }

    /// Moving-average factor `1 + theta_1 B^s + theta_2 B^{2s} + ...`
    pub fn moving_average(theta: &[f64], spacing: usize) -> Self {
        Self::spaced(theta, spacing, 1.0)
    }

    fn spaced(params: &[f64], spacing: usize, sign: f64) -> Self {
        if params.is_empty() || spacing == 0 {
            return Self::one();
        }
        let mut coefficients = vec![0.0; params.len() * spacing + 1];
        coefficients[0] = 1.0;
        for (i, value) in params.iter().enumerate() {
            coefficients[(i + 1) * spacing] = sign * value;
        }
        Self { coefficients }
    }

    /// Differencing operator `(1 - B)^d (1 - B^m)^D`
    pub fn differencing(d: usize, seasonal_d: usize, period: usize) -> Self {
        let mut result = Self::one();
        let first = Self::from_coefficients(vec![1.0, -1.0]);
        for _ in 0..d {
            result = result.multiply(&first);
        }
        if period > 0 {
            let seasonal = Self::autoregressive(&[1.0], period);
            for _ in 0..seasonal_d {
                result = result.multiply(&seasonal);
            }
        }
        result
    }

    /// Polynomial product
    pub fn multiply(&self, other: &LagPolynomial) -> LagPolynomial {
        let mut product = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] += a * b;
            }
        }
        LagPolynomial {
            coefficients: product,
        }
    }

    /// Highest lag with a stored coefficient
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient of `B^lag`, zero beyond the degree
    pub fn coefficient(&self, lag: usize) -> f64 {
        self.coefficients.get(lag).copied().unwrap_or(0.0)
    }

    /// All coefficients, lag 0 first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// Psi weights of `ar(B) y_t = ma(B) e_t`, i.e. the coefficients of `ma(B) / ar(B)`.
///
/// `psi_0` is always one. The forecast error variance at horizon `h` is
/// `sigma2 * sum_{j<h} psi_j^2`.
pub fn psi_weights(ar: &LagPolynomial, ma: &LagPolynomial, count: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut value = ma.coefficient(j);
        for i in 1..=j.min(ar.degree()) {
            value -= ar.coefficient(i) * psi[j - i];
        }
        psi.push(value);
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoregressive_spacing() {
        let poly = LagPolynomial::autoregressive(&[0.5, 0.25], 12);
        assert_eq!(poly.degree(), 24);
        assert_eq!(poly.coefficient(0), 1.0);
        assert_eq!(poly.coefficient(12), -0.5);
        assert_eq!(poly.coefficient(24), -0.25);
        assert_eq!(poly.coefficient(13), 0.0);
    }

    #[test]
    fn test_differencing_operator() {
        // (1 - B)(1 - B^4) = 1 - B - B^4 + B^5
        let poly = LagPolynomial::differencing(1, 1, 4);
        assert_eq!(poly.coefficients(), &[1.0, -1.0, 0.0, 0.0, -1.0, 1.0]);

        let squared = LagPolynomial::differencing(2, 0, 12);
        assert_eq!(squared.coefficients(), &[1.0, -2.0, 1.0]);
    }

    #[test]
    fn test_multiply_identity() {
        let poly = LagPolynomial::moving_average(&[0.3], 1);
        assert_eq!(poly.multiply(&LagPolynomial::one()), poly);
    }

    #[test]
    fn test_psi_weights_ar1() {
        // psi_j = phi^j for an AR(1)
        let ar = LagPolynomial::autoregressive(&[0.5], 1);
        let psi = psi_weights(&ar, &LagPolynomial::one(), 4);
        assert_eq!(psi, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_psi_weights_random_walk() {
        let ar = LagPolynomial::differencing(1, 0, 0);
        let psi = psi_weights(&ar, &LagPolynomial::one(), 5);
        assert!(psi.iter().all(|w| (*w - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_psi_weights_ma1() {
        let ma = LagPolynomial::moving_average(&[0.4], 1);
        let psi = psi_weights(&LagPolynomial::one(), &ma, 3);
        assert_eq!(psi, vec![1.0, 0.4, 0.0]);
    }
}
