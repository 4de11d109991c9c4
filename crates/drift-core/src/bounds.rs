//! Concentration bounds and guarded arithmetic
//!
//! The helpers return [`Result`] rather than NaN or infinity so that a
//! detector can tell "not enough data yet" apart from a real comparison.

use crate::error::{Error, Result};

/// Natural logarithm of a strictly positive, finite argument
pub fn ln_checked(x: f64) -> Result<f64> {
    if x.is_finite() && x > 0.0 {
        Ok(x.ln())
    } else {
        Err(Error::Domain(format!("logarithm of {x}")))
    }
}

/// `numerator / denominator` for a non-zero count
pub fn ratio(numerator: f64, denominator: usize) -> Result<f64> {
    if denominator == 0 {
        Err(Error::empty_input())
    } else {
        Ok(numerator / denominator as f64)
    }
}

/// One-sided Hoeffding bound `sqrt(ln(1/delta) / (2n))` for `n` samples in [0, 1]
pub fn hoeffding_bound(delta: f64, n: usize) -> Result<f64> {
    if n == 0 {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    let log_term = ln_checked(1.0 / delta)?;
    Ok((log_term / (2.0 * n as f64)).sqrt())
}

/// McDiarmid bound `sqrt(0.5 * sigma * ln(1/delta))`
///
/// `sigma` is the sum of squared normalised weights of the weighted average.
pub fn mcdiarmid_bound(sigma: f64, delta: f64) -> Result<f64> {
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(Error::Domain(format!("weight dispersion {sigma}")));
    }
    let log_term = ln_checked(1.0 / delta)?;
    Ok((0.5 * sigma * log_term).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hoeffding_bound() {
        // ln(1e6) / 200 = 0.069078 -> 0.262826
        let eps = hoeffding_bound(1e-6, 100).unwrap();
        assert_relative_eq!(eps, (1e6f64.ln() / 200.0).sqrt(), epsilon = 1e-12);
        assert!((eps - 0.2628).abs() < 1e-3);

        assert!(hoeffding_bound(1e-6, 0).is_err());
        assert!(hoeffding_bound(0.0, 10).is_err());
    }

    #[test]
    fn test_mcdiarmid_equals_hoeffding_for_uniform_weights() {
        // Uniform weights: sigma = n * (1/n)^2 = 1/n
        let n = 100;
        let sigma = 1.0 / n as f64;
        assert_relative_eq!(
            mcdiarmid_bound(sigma, 1e-6).unwrap(),
            hoeffding_bound(1e-6, n).unwrap(),
            epsilon = 1e-12
        );
        assert!(mcdiarmid_bound(f64::NAN, 1e-6).is_err());
    }

    #[test]
    fn test_guards() {
        assert!(ln_checked(0.0).is_err());
        assert!(ln_checked(-1.0).is_err());
        assert_relative_eq!(ln_checked(std::f64::consts::E).unwrap(), 1.0);
        assert!(ratio(3.0, 0).is_err());
        assert_relative_eq!(ratio(3.0, 4).unwrap(), 0.75);
    }
}
