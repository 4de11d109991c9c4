//! EDDM (Early Drift Detection Method)
//!
//! Baena-García et al., "Early drift detection method", 2006.
//!
//! Instead of the error rate, EDDM monitors the distance (in observations)
//! between consecutive errors. While the concept is stable the distance
//! grows; its running `mean + 2 * stdev` is compared against the largest value
//! seen so far.

use drift_core::{check_probability, check_size, DetectorSettings, DriftDetector, Error, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// EDDM parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EddmParameters {
    /// Observations required before the distance statistic is evaluated
    pub min_instance: usize,
    /// Errors required before warning/drift can be signalled
    pub min_errors: usize,
    /// Warning when `m2s / m2s_max` drops below this ratio
    pub warning_ratio: f64,
    /// Drift when `m2s / m2s_max` drops below this ratio
    pub drift_ratio: f64,
}

impl Default for EddmParameters {
    fn default() -> Self {
        Self {
            min_instance: 30,
            min_errors: 30,
            warning_ratio: 0.95,
            drift_ratio: 0.90,
        }
    }
}

impl EddmParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("min_instance", self.min_instance)?;
        check_size("min_errors", self.min_errors)?;
        check_probability("warning_ratio", self.warning_ratio)?;
        check_probability("drift_ratio", self.drift_ratio)?;
        if self.drift_ratio > self.warning_ratio {
            return Err(Error::InvalidParameter(format!(
                "drift_ratio {} must not exceed warning_ratio {}",
                self.drift_ratio, self.warning_ratio
            )));
        }
        Ok(())
    }
}

/// EDDM detector
#[derive(Debug, Clone)]
pub struct EddmDetector {
    params: EddmParameters,
    seen: usize,
    errors: usize,
    // running mean and M2 of the inter-error distance
    mean_distance: f64,
    m2: f64,
    m2s_max: f64,
    latest_error: usize,
    second_latest_error: usize,
}

impl EddmDetector {
    /// Create a new EDDM detector
    pub fn new(params: EddmParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: EddmParameters) -> Self {
        Self {
            params,
            seen: 0,
            errors: 0,
            mean_distance: 0.0,
            m2: 0.0,
            m2s_max: 0.0,
            latest_error: 0,
            second_latest_error: 0,
        }
    }

    pub fn parameters(&self) -> &EddmParameters {
        &self.params
    }

    /// Running mean of the distance between consecutive errors
    pub fn mean_distance(&self) -> f64 {
        self.mean_distance
    }
}

impl Default for EddmDetector {
    fn default() -> Self {
        Self::build(EddmParameters::default())
    }
}

impl DriftDetector for EddmDetector {
    fn algorithm_name(&self) -> &'static str {
        "EDDM"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        self.seen += 1;
        if is_correct {
            return Signal::NONE;
        }

        self.errors += 1;
        self.second_latest_error = self.latest_error;
        self.latest_error = self.seen;
        let distance = (self.latest_error - self.second_latest_error) as f64;

        let old_mean = self.mean_distance;
        self.mean_distance += (distance - self.mean_distance) / self.errors as f64;
        self.m2 += (distance - self.mean_distance) * (distance - old_mean);

        let std_dev = (self.m2 / self.errors as f64).max(0.0).sqrt();
        let m2s = self.mean_distance + 2.0 * std_dev;

        if self.seen <= self.params.min_instance {
            return Signal::NONE;
        }

        if m2s > self.m2s_max {
            self.m2s_max = m2s;
            return Signal::NONE;
        }
        if self.errors <= self.params.min_errors || self.m2s_max <= 0.0 {
            return Signal::NONE;
        }

        let ratio = m2s / self.m2s_max;
        let signal = Signal::new(ratio < self.params.warning_ratio, ratio < self.params.drift_ratio);
        if signal.drift {
            debug!(ratio, m2s, m2s_max = self.m2s_max, "EDDM drift");
        }
        signal
    }

    fn reset(&mut self) {
        *self = Self::build(self.params.clone());
    }

    fn settings(&self) -> DetectorSettings {
        let n = self.params.min_instance;
        DetectorSettings::new(n.to_string(), format!("$n_{{min}}$:{n}"))
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_instance.max(self.params.min_errors) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Errors every `gap` observations
    fn periodic(gap: usize, len: usize) -> impl Iterator<Item = bool> {
        (1..=len).map(move |i| i % gap != 0)
    }

    #[test]
    fn test_shrinking_error_distance_drifts() {
        let mut eddm = EddmDetector::default();
        for obs in periodic(20, 2000) {
            assert!(!eddm.run(obs).drift);
        }

        let drifted = periodic(2, 400).any(|obs| eddm.run(obs).drift);
        assert!(drifted, "errors every other step should trigger drift");
    }

    #[test]
    fn test_waits_for_min_errors() {
        let mut eddm = EddmDetector::default();
        // 30 errors in total: never more than min_errors
        for obs in periodic(10, 300) {
            assert_eq!(eddm.run(obs), Signal::NONE);
        }
    }

    #[test]
    fn test_validation() {
        let params = EddmParameters {
            warning_ratio: 0.8,
            drift_ratio: 0.9,
            ..Default::default()
        };
        assert!(EddmDetector::new(params).is_err());
        assert!(EddmDetector::new(EddmParameters::default()).is_ok());
    }
}
