//! FHDDM (Fast Hoeffding Drift Detection Method)
//!
//! Pesaranghader & Viktor, "Fast Hoeffding drift detection method for
//! evolving data streams", ECML PKDD 2016.
//!
//! Slides a window of the last `n` correctness values, tracks the highest
//! accuracy seen so far and signals drift when the current accuracy falls
//! more than `epsilon = sqrt(ln(1/delta) / 2n)` below it.

use drift_core::{
    check_probability, check_size, format_value, hoeffding_bound, BoolWindow, DetectorSettings, DriftDetector,
    Result, Signal,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// FHDDM parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FhddmParameters {
    /// Sliding window size
    pub n: usize,
    /// Probability of a false alarm
    pub delta: f64,
}

impl Default for FhddmParameters {
    fn default() -> Self {
        Self { n: 100, delta: 1e-6 }
    }
}

impl FhddmParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("n", self.n)?;
        check_probability("delta", self.delta)
    }
}

/// FHDDM detector
#[derive(Debug, Clone)]
pub struct FhddmDetector {
    params: FhddmParameters,
    epsilon: f64,
    window: BoolWindow,
    mu_max: f64,
}

impl FhddmDetector {
    /// Create a new FHDDM detector
    pub fn new(params: FhddmParameters) -> Result<Self> {
        params.validate()?;
        let epsilon = hoeffding_bound(params.delta, params.n)?;
        Ok(Self {
            window: BoolWindow::new(params.n),
            params,
            epsilon,
            mu_max: 0.0,
        })
    }

    pub fn parameters(&self) -> &FhddmParameters {
        &self.params
    }

    /// Hoeffding bound used as the drift threshold
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Highest window accuracy seen since the last reset
    pub fn mu_max(&self) -> f64 {
        self.mu_max
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}

impl DriftDetector for FhddmDetector {
    fn algorithm_name(&self) -> &'static str {
        "FHDDM"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        self.window.push(is_correct);
        if !self.window.is_full() {
            return Signal::NONE;
        }

        let mu_t = self.window.count_ones() as f64 / self.params.n as f64;
        if self.mu_max < mu_t {
            self.mu_max = mu_t;
        }
        let drift = self.mu_max - mu_t > self.epsilon;
        if drift {
            debug!(mu_t, mu_max = self.mu_max, epsilon = self.epsilon, "FHDDM drift");
        }
        Signal::drift_if(drift)
    }

    fn reset(&mut self) {
        self.window.clear();
        self.mu_max = 0.0;
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        DetectorSettings::new(
            format!("{}.{}", p.n, format_value(p.delta)),
            format!("$n$:{}, $\\delta$:{}", p.n, format_value(p.delta)),
        )
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_epsilon() {
        let fhddm = FhddmDetector::new(FhddmParameters::default()).unwrap();
        assert_relative_eq!(fhddm.epsilon(), (1e6f64.ln() / 200.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_window_bound() {
        let mut fhddm = FhddmDetector::new(FhddmParameters { n: 25, delta: 1e-6 }).unwrap();
        for i in 0..100 {
            fhddm.run(i % 3 != 0);
            assert_eq!(fhddm.window_len(), (i + 1).min(25));
        }
    }

    #[test]
    fn test_accuracy_drop_drifts() {
        let mut fhddm = FhddmDetector::new(FhddmParameters::default()).unwrap();
        for _ in 0..100 {
            assert!(!fhddm.run(true).drift);
        }
        assert_eq!(fhddm.mu_max(), 1.0);

        // 40% errors: window accuracy reaches 1 - 27/100 after 27 errors
        let drift_at = (0..100).position(|i| fhddm.run(i % 5 != 0 && i % 5 != 2).drift);
        assert!(drift_at.is_some());
    }

    #[test]
    fn test_reset_clears_maximum() {
        let mut fhddm = FhddmDetector::new(FhddmParameters { n: 10, delta: 0.01 }).unwrap();
        for _ in 0..20 {
            fhddm.run(true);
        }
        fhddm.reset();
        assert_eq!(fhddm.window_len(), 0);
        assert_eq!(fhddm.mu_max(), 0.0);
    }

    #[test]
    fn test_settings() {
        let settings = FhddmDetector::new(FhddmParameters::default()).unwrap().settings();
        assert_eq!(settings.id, "100.1E-06");
        assert_eq!(settings.label, "$n$:100, $\\delta$:1E-06");
    }
}
