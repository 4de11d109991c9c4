//! Error types for drift detection
//!
//! Provides a unified error type for all drift-* crates. Errors surface in two
//! places only: detector construction (invalid configuration) and the numeric
//! helpers in [`crate::bounds`], whose failures detectors fold into "no signal".

use thiserror::Error;

/// Core error type for drift detection
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough observations for the requested statistic
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Argument outside the mathematical domain of a computation (log of zero, ...)
    #[error("Domain error: {0}")]
    Domain(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an empty window or reservoir
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a probability that must lie strictly inside (0, 1)
    pub fn invalid_probability(name: &str, p: f64) -> Self {
        Self::InvalidParameter(format!("{name} = {p} must be in (0, 1)"))
    }

    /// Create an error for a size that must be at least one
    pub fn zero_size(name: &str) -> Self {
        Self::InvalidParameter(format!("{name} must be at least 1"))
    }

    /// Create an error for a value that must be finite and strictly positive
    pub fn non_positive(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("{name} = {value} must be finite and positive"))
    }
}

/// Check that `p` lies strictly inside (0, 1)
pub fn check_probability(name: &str, p: f64) -> Result<()> {
    if p.is_finite() && p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(Error::invalid_probability(name, p))
    }
}

/// Check that a window or block size is non-zero
pub fn check_size(name: &str, size: usize) -> Result<()> {
    if size == 0 {
        Err(Error::zero_size(name))
    } else {
        Ok(())
    }
}

/// Check that a rate or threshold is finite and strictly positive
pub fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::non_positive(name, value))
    }
}
