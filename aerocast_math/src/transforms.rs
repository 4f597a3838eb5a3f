//! Parameter transforms that keep ARMA polynomials stationary
//!
//! Unconstrained values are squashed into partial autocorrelations in
//! `(-1, 1)` and then mapped to polynomial coefficients with the
//! Durbin-Levinson recursion (Monahan, 1984; Jones, 1980).

/// Map unconstrained reals to coefficients `phi` whose polynomial
/// `1 - phi_1 B - ... - phi_n B^n` has all roots outside the unit circle.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let n = unconstrained.len();
    if n == 0 {
        return Vec::new();
    }

    let partials: Vec<f64> = unconstrained
        .iter()
        .map(|x| x / (1.0 + x * x).sqrt())
        .collect();

    let mut previous = vec![0.0; n];
    let mut current = vec![0.0; n];
    for k in 0..n {
        for i in 0..k {
            current[i] = previous[i] + partials[k] * previous[k - i - 1];
        }
        current[k] = partials[k];
        previous[..=k].copy_from_slice(&current[..=k]);
    }

    current.iter().map(|v| -v).collect()
}

/// Same mapping with the sign flipped, for invertible moving-average
/// polynomials written as `1 + theta_1 B + ...`.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|v| -v)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(constrain_stationary(&[]).is_empty());
    }

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(constrain_stationary(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_coefficient_bounded() {
        for x in [-1e6, -3.0, -0.5, 0.5, 3.0, 1e6] {
            let phi = constrain_stationary(&[x])[0];
            assert!(phi.abs() < 1.0, "phi = {}", phi);
        }
    }

    #[test]
    fn test_ar2_stationarity_triangle() {
        for (a, b) in [(5.0, -5.0), (-2.0, 0.3), (0.9, 0.9), (-7.0, -7.0)] {
            let phi = constrain_stationary(&[a, b]);
            assert!(phi[1].abs() < 1.0);
            assert!(phi[0] + phi[1] < 1.0);
            assert!(phi[1] - phi[0] < 1.0);
        }
    }

    #[test]
    fn test_invertible_is_negated() {
        let phi = constrain_stationary(&[0.7, -0.2]);
        let theta = constrain_invertible(&[0.7, -0.2]);
        assert_eq!(theta, vec![-phi[0], -phi[1]]);
    }
}
