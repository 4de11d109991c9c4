//! DDM (Drift Detection Method)
//!
//! Gama et al., "Learning with drift detection", SBIA 2004.
//!
//! Tracks the error rate `p` of the classifier as a running mean together
//! with its binomial standard deviation `s`, and remembers the point where
//! `p + s` was smallest. Warning fires at `p_min + 2 s_min`, drift at
//! `p_min + 3 s_min`.

use crate::UNSET;
use drift_core::{check_size, DetectorSettings, DriftDetector, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// DDM parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdmParameters {
    /// Observations required before any signal
    pub min_instance: usize,
}

impl Default for DdmParameters {
    fn default() -> Self {
        Self { min_instance: 30 }
    }
}

impl DdmParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("min_instance", self.min_instance)
    }
}

/// DDM detector
#[derive(Debug, Clone)]
pub struct DdmDetector {
    params: DdmParameters,
    // starts at 1, incremented after each update
    seen: usize,
    p: f64,
    s: f64,
    p_min: f64,
    s_min: f64,
}

impl DdmDetector {
    /// Create a new DDM detector
    pub fn new(params: DdmParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: DdmParameters) -> Self {
        Self {
            params,
            seen: 1,
            p: 1.0,
            s: 0.0,
            p_min: UNSET,
            s_min: UNSET,
        }
    }

    pub fn parameters(&self) -> &DdmParameters {
        &self.params
    }

    /// Current error-rate estimate
    pub fn error_rate(&self) -> f64 {
        self.p
    }
}

impl Default for DdmDetector {
    fn default() -> Self {
        Self::build(DdmParameters::default())
    }
}

impl DriftDetector for DdmDetector {
    fn algorithm_name(&self) -> &'static str {
        "DDM"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let error = if is_correct { 0.0 } else { 1.0 };
        let n = self.seen as f64;

        self.p += (error - self.p) / n;
        self.s = (self.p * (1.0 - self.p) / n).max(0.0).sqrt();
        self.seen += 1;

        if self.seen < self.params.min_instance {
            return Signal::NONE;
        }

        if self.p + self.s <= self.p_min + self.s_min {
            self.p_min = self.p;
            self.s_min = self.s;
        }

        let current_level = self.p + self.s;
        let warning = current_level > self.p_min + 2.0 * self.s_min;
        let drift = current_level > self.p_min + 3.0 * self.s_min;
        if drift {
            debug!(p = self.p, s = self.s, p_min = self.p_min, s_min = self.s_min, "DDM drift");
        }
        Signal::new(warning, drift)
    }

    fn reset(&mut self) {
        *self = Self::build(self.params.clone());
    }

    fn settings(&self) -> DetectorSettings {
        let n = self.params.min_instance;
        DetectorSettings::new(n.to_string(), format!("$n_{{min}}$:{n}"))
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_instance.saturating_sub(1).max(1)
    }
}
