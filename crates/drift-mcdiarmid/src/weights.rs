//! Weight progressions over window positions
//!
//! Position `0` is the oldest observation in the window. All progressions
//! are non-decreasing so recent observations weigh at least as much as old
//! ones. Weights are only ever used normalised, so geometric and Euler
//! weights are computed relative to the newest position to stay finite for
//! long windows.

use drift_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// How the weight grows from one window position to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// `1 + i * difference`
    Arithmetic { difference: f64 },
    /// `ratio^i`
    Geometric { ratio: f64 },
    /// `e^(lambda * i)`
    Euler { lambda: f64 },
}

impl WeightScheme {
    pub fn validate(&self) -> Result<()> {
        let (name, value, ok) = match *self {
            WeightScheme::Arithmetic { difference } => ("difference", difference, difference >= 0.0),
            WeightScheme::Geometric { ratio } => ("ratio", ratio, ratio >= 1.0),
            WeightScheme::Euler { lambda } => ("lambda", lambda, lambda >= 0.0),
        };
        if value.is_finite() && ok {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!("{name} = {value} is not a valid weight progression")))
        }
    }

    /// Short name of the scheme used in algorithm names
    pub fn suffix(&self) -> &'static str {
        match self {
            WeightScheme::Arithmetic { .. } => "A",
            WeightScheme::Geometric { .. } => "G",
            WeightScheme::Euler { .. } => "E",
        }
    }

    /// Symbol and value of the progression parameter, as shown in labels
    pub fn parameter(&self) -> (&'static str, f64) {
        match *self {
            WeightScheme::Arithmetic { difference } => ("d", difference),
            WeightScheme::Geometric { ratio } => ("r", ratio),
            WeightScheme::Euler { lambda } => ("l", lambda),
        }
    }

    /// Unnormalised weight of position `i` in a window of `n`
    fn raw_weight(&self, i: usize, n: usize) -> f64 {
        let offset = i as f64 - (n as f64 - 1.0);
        match *self {
            WeightScheme::Arithmetic { difference } => 1.0 + i as f64 * difference,
            WeightScheme::Geometric { ratio } => ratio.powf(offset),
            WeightScheme::Euler { lambda } => (lambda * offset).exp(),
        }
    }

    /// Normalised weights for a window of `n` positions, summing to one
    pub fn normalized_weights(&self, n: usize) -> Result<Vec<f64>> {
        self.validate()?;
        let raw: Vec<f64> = (0..n).map(|i| self.raw_weight(i, n)).collect();
        let sum: f64 = raw.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(Error::Domain(format!("weight sum {sum} for window of {n}")));
        }
        Ok(raw.into_iter().map(|w| w / sum).collect())
    }
}

/// Sum of squared normalised weights
pub fn dispersion(weights: &[f64]) -> f64 {
    weights.iter().map(|w| w * w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_one() {
        let schemes = [
            WeightScheme::Arithmetic { difference: 0.01 },
            WeightScheme::Geometric { ratio: 1.01 },
            WeightScheme::Euler { lambda: 0.01 },
        ];
        for scheme in schemes {
            let weights = scheme.normalized_weights(100).unwrap();
            assert_relative_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert!(weights.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_arithmetic_weights() {
        let weights = WeightScheme::Arithmetic { difference: 1.0 }.normalized_weights(3).unwrap();
        // raw 1, 2, 3
        assert_relative_eq!(weights[0], 1.0 / 6.0);
        assert_relative_eq!(weights[2], 0.5);
    }

    #[test]
    fn test_geometric_and_euler_agree() {
        let lambda: f64 = 0.05;
        let euler = WeightScheme::Euler { lambda }.normalized_weights(50).unwrap();
        let geometric = WeightScheme::Geometric { ratio: lambda.exp() }.normalized_weights(50).unwrap();
        for (a, b) in euler.iter().zip(&geometric) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_uniform_dispersion() {
        let weights = WeightScheme::Arithmetic { difference: 0.0 }.normalized_weights(100).unwrap();
        assert_relative_eq!(dispersion(&weights), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_long_windows_stay_finite() {
        let weights = WeightScheme::Euler { lambda: 5.0 }.normalized_weights(1000).unwrap();
        assert!(weights.iter().all(|w| w.is_finite()));
        assert_relative_eq!(weights[999], 1.0 - (-5.0f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_scheme() {
        assert!(WeightScheme::Geometric { ratio: 0.0 }.validate().is_err());
        assert!(WeightScheme::Arithmetic { difference: f64::NAN }.validate().is_err());
        assert!(WeightScheme::Euler { lambda: -1.0 }.validate().is_err());
    }
}
