//! EWMA (Exponentially Weighted Moving Average) drift detection
//!
//! Ross et al., "Exponentially weighted moving average charts for detecting
//! concept drift", Pattern Recognition Letters 2012.
//!
//! The EWMA `z_t` of the error indicator is compared with the running error
//! rate `p` plus a control limit `L_t * s`, where `s` is the EWMA standard
//! deviation and `L_t` is a polynomial in `p` fitted for a fixed average run
//! length. Warning fires at half the limit.

use drift_core::{check_probability, check_size, format_value, DetectorSettings, DriftDetector, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// EWMA parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EwmaParameters {
    /// Observations required before any signal
    pub min_instance: usize,
    /// Smoothing parameter (0 < lambda < 1)
    pub lambda: f64,
}

impl Default for EwmaParameters {
    fn default() -> Self {
        Self {
            min_instance: 30,
            lambda: 0.2,
        }
    }
}

impl EwmaParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("min_instance", self.min_instance)?;
        check_probability("lambda", self.lambda)
    }
}

/// Control limit multiplier for the current error rate
pub fn control_limit(p: f64) -> f64 {
    3.97 - 6.56 * p + 48.73 * p.powi(3) - 330.13 * p.powi(5) + 848.18 * p.powi(7)
}

/// EWMA drift detector
#[derive(Debug, Clone)]
pub struct EwmaDetector {
    params: EwmaParameters,
    m_n: f64,
    m_sum: f64,
    m_p: f64,
    m_s: f64,
    z_t: f64,
}

impl EwmaDetector {
    /// Create a new EWMA detector
    pub fn new(params: EwmaParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: EwmaParameters) -> Self {
        Self {
            params,
            m_n: 1.0,
            m_sum: 0.0,
            m_p: 0.0,
            m_s: 0.0,
            z_t: 0.0,
        }
    }

    pub fn parameters(&self) -> &EwmaParameters {
        &self.params
    }

    /// Current EWMA of the error indicator
    pub fn ewma(&self) -> f64 {
        self.z_t
    }

    /// Current error-rate estimate
    pub fn error_rate(&self) -> f64 {
        self.m_p
    }
}

impl Default for EwmaDetector {
    fn default() -> Self {
        Self::build(EwmaParameters::default())
    }
}

impl DriftDetector for EwmaDetector {
    fn algorithm_name(&self) -> &'static str {
        "EWMA"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let error = if is_correct { 0.0 } else { 1.0 };
        let lambda = self.params.lambda;

        self.m_sum += error;
        self.m_p = self.m_sum / self.m_n;
        let decay = 1.0 - (1.0 - lambda).powf(2.0 * self.m_n);
        self.m_s = (self.m_p * (1.0 - self.m_p) * lambda * decay / (2.0 - lambda))
            .max(0.0)
            .sqrt();
        self.m_n += 1.0;

        self.z_t += lambda * (error - self.z_t);
        let limit = control_limit(self.m_p);

        if self.m_n < self.params.min_instance as f64 {
            return Signal::NONE;
        }

        if self.z_t > self.m_p + limit * self.m_s {
            debug!(z_t = self.z_t, p = self.m_p, limit, "EWMA drift");
            Signal::DRIFT
        } else if self.z_t > self.m_p + 0.5 * limit * self.m_s {
            Signal::WARNING
        } else {
            Signal::NONE
        }
    }

    fn reset(&mut self) {
        *self = Self::build(self.params.clone());
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        DetectorSettings::new(
            format!("{}.{}", p.min_instance, format_value(p.lambda)),
            format!("$n_{{min}}$:{}, $\\lambda$:{}", p.min_instance, format_value(p.lambda)),
        )
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_instance.saturating_sub(1).max(1)
    }
}
