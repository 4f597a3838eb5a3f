//! # Aerocast workspace
//!
//! Umbrella crate for the workspace. It re-exports the member crates so
//! downstream code can depend on a single package.
//!
//! ## Example
//!
//! ```
//! use aerocast_workspace::aerocast::{ModelOrder, SarimaSpec, SeasonalOrder};
//!
//! let spec = SarimaSpec::new(ModelOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12));
//! assert_eq!(spec.to_string(), "SARIMA(1,1,1)(1,1,1,12)");
//! ```

pub use aerocast;
pub use aerocast_math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_airline_model() {
        let spec = aerocast::SarimaSpec::default();
        assert_eq!(spec.order, aerocast::ModelOrder::new(1, 1, 1));
        assert_eq!(spec.seasonal_order, aerocast::SeasonalOrder::new(1, 1, 1, 12));
    }

    #[test]
    fn test_math_reexport() {
        let poly = aerocast_math::LagPolynomial::differencing(1, 0, 12);
        assert_eq!(poly.coefficients(), &[1.0, -1.0]);
    }
}
