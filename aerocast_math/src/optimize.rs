//! Derivative-free minimization

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Outcome of a minimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Number of simplex iterations performed
    pub iterations: usize,
    /// Whether the simplex collapsed below the tolerance before the iteration limit
    pub converged: bool,
}

/// Nelder-Mead simplex minimizer with the standard reflection,
/// expansion, contraction and shrink coefficients.
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    tolerance: f64,
    initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 1e-10,
            initial_step: 0.5,
        }
    }
}

impl NelderMead {
    /// Create a minimizer with explicit limits
    pub fn new(max_iterations: usize, tolerance: f64, initial_step: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(MathError::InvalidInput(
                "Iteration limit must be positive".to_string(),
            ));
        }
        if !(tolerance > 0.0) || !(initial_step > 0.0) {
            return Err(MathError::InvalidInput(
                "Tolerance and initial step must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_iterations,
            tolerance,
            initial_step,
        })
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// Non-finite objective values are treated as `+inf`, which pushes the
    /// simplex away from them. An error is returned only when no finite value
    /// was ever observed.
    pub fn minimize<F>(&self, mut objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut eval = |x: &[f64]| {
            let v = objective(x);
            if v.is_finite() {
                v
            } else {
                f64::INFINITY
            }
        };

        let n = start.len();
        if n == 0 {
            let value = eval(start);
            if !value.is_finite() {
                return Err(MathError::CalculationError(
                    "Objective is not finite".to_string(),
                ));
            }
            return Ok(Minimum {
                point: Vec::new(),
                value,
                iterations: 0,
                converged: true,
            });
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.to_vec());
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            simplex = order.iter().map(|&i| simplex[i].clone()).collect();
            values = order.iter().map(|&i| values[i]).collect();

            let best = values[0];
            let worst = values[n];
            if best.is_finite() && worst.is_finite() {
                let spread = (worst - best).abs();
                if spread <= self.tolerance * (best.abs() + worst.abs() + self.tolerance) {
                    converged = true;
                    break;
                }
            }

            iterations += 1;

            let mut centroid = vec![0.0; n];
            for vertex in simplex.iter().take(n) {
                for (c, v) in centroid.iter_mut().zip(vertex) {
                    *c += v / n as f64;
                }
            }

            let along = |coef: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&simplex[n])
                    .map(|(c, w)| c + coef * (c - w))
                    .collect()
            };

            let reflected = along(1.0);
            let reflected_value = eval(&reflected);

            if reflected_value < values[0] {
                let expanded = along(2.0);
                let expanded_value = eval(&expanded);
                if expanded_value < reflected_value {
                    simplex[n] = expanded;
                    values[n] = expanded_value;
                } else {
                    simplex[n] = reflected;
                    values[n] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[n - 1] {
                simplex[n] = reflected;
                values[n] = reflected_value;
                continue;
            }

            let (contracted, contracted_value) = if reflected_value < values[n] {
                let outside = along(0.5);
                let value = eval(&outside);
                (outside, value)
            } else {
                let inside = along(-0.5);
                let value = eval(&inside);
                (inside, value)
            };

            if contracted_value < values[n].min(reflected_value) {
                simplex[n] = contracted;
                values[n] = contracted_value;
                continue;
            }

            // Shrink towards the best vertex
            let anchor = simplex[0].clone();
            for i in 1..=n {
                let shrunk: Vec<f64> = anchor
                    .iter()
                    .zip(&simplex[i])
                    .map(|(a, v)| a + 0.5 * (v - a))
                    .collect();
                values[i] = eval(&shrunk);
                simplex[i] = shrunk;
            }
        }

        let best_index = (0..=n)
            .min_by(|&a, &b| values[a].total_cmp(&values[b]))
            .unwrap_or(0);

        if !values[best_index].is_finite() {
            return Err(MathError::CalculationError(
                "Objective was not finite at any simplex vertex".to_string(),
            ));
        }

        Ok(Minimum {
            point: simplex[best_index].clone(),
            value: values[best_index],
            iterations,
            converged,
        })
    }
}
