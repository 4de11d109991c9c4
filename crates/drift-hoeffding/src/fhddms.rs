//! FHDDMS (Stacking Fast Hoeffding Drift Detection Method)
//!
//! Pesaranghader et al., "Reservoir of diverse adaptive learners and stacking
//! fast Hoeffding drift detection methods for evolving data streams", 2017.
//!
//! One window of `m * n` observations viewed as `m` stacked sub-windows of
//! size `n`. The most recent sub-window (short window) catches abrupt drift,
//! the mean over all sub-windows (long window) catches gradual drift; each
//! is tested against the Hoeffding bound for its own sample count.

use drift_core::{
    check_probability, check_size, format_value, hoeffding_bound, BoolWindow, DetectorSettings, DriftDetector,
    Result, Signal,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters shared by FHDDMS and FHDDMS.add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FhddmsParameters {
    /// Number of stacked sub-windows
    pub m: usize,
    /// Size of each sub-window
    pub n: usize,
    /// Probability of a false alarm
    pub delta: f64,
}

impl Default for FhddmsParameters {
    fn default() -> Self {
        Self {
            m: 4,
            n: 25,
            delta: 1e-6,
        }
    }
}

impl FhddmsParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("m", self.m)?;
        check_size("n", self.n)?;
        check_probability("delta", self.delta)
    }

    /// Size of the long window
    pub fn long_window(&self) -> usize {
        self.m * self.n
    }

    pub(crate) fn settings(&self) -> DetectorSettings {
        let delta = format_value(self.delta);
        DetectorSettings::new(
            format!("{}.{}.{}", self.n, self.long_window(), delta),
            format!("$n_s$:{}, $n_l$:{}, $\\delta$:{}", self.n, self.long_window(), delta),
        )
    }
}

/// Short and long window thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StackedBounds {
    pub short: f64,
    pub long: f64,
}

impl StackedBounds {
    pub fn new(params: &FhddmsParameters) -> Result<Self> {
        Ok(Self {
            short: hoeffding_bound(params.delta, params.n)?,
            long: hoeffding_bound(params.delta, params.long_window())?,
        })
    }
}

/// FHDDMS detector
#[derive(Debug, Clone)]
pub struct FhddmsDetector {
    params: FhddmsParameters,
    bounds: StackedBounds,
    window: BoolWindow,
    mu_max_short: f64,
    mu_max_long: f64,
}

impl FhddmsDetector {
    /// Create a new FHDDMS detector
    pub fn new(params: FhddmsParameters) -> Result<Self> {
        params.validate()?;
        let bounds = StackedBounds::new(&params)?;
        Ok(Self {
            window: BoolWindow::new(params.long_window()),
            params,
            bounds,
            mu_max_short: 0.0,
            mu_max_long: 0.0,
        })
    }

    pub fn parameters(&self) -> &FhddmsParameters {
        &self.params
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Accuracy of each sub-window, oldest first
    fn sub_window_means(&self) -> Vec<f64> {
        let n = self.params.n;
        (0..self.params.m)
            .map(|i| self.window.count_ones_in(i * n, (i + 1) * n) as f64 / n as f64)
            .collect()
    }
}

impl DriftDetector for FhddmsDetector {
    fn algorithm_name(&self) -> &'static str {
        "FHDDMS"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        self.window.push(is_correct);
        if !self.window.is_full() {
            return Signal::NONE;
        }

        let means = self.sub_window_means();
        let Some(&mu_short) = means.last() else {
            return Signal::NONE;
        };
        if self.mu_max_short < mu_short {
            self.mu_max_short = mu_short;
        }
        if self.mu_max_short - mu_short > self.bounds.short {
            debug!(mu_short, mu_max = self.mu_max_short, "FHDDMS short window drift");
            return Signal::DRIFT;
        }

        let mu_long = means.iter().sum::<f64>() / self.params.m as f64;
        if self.mu_max_long < mu_long {
            self.mu_max_long = mu_long;
        }
        if self.mu_max_long - mu_long > self.bounds.long {
            debug!(mu_long, mu_max = self.mu_max_long, "FHDDMS long window drift");
            return Signal::DRIFT;
        }
        Signal::NONE
    }

    fn reset(&mut self) {
        self.window.clear();
        self.mu_max_short = 0.0;
        self.mu_max_long = 0.0;
    }

    fn settings(&self) -> DetectorSettings {
        self.params.settings()
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.long_window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abrupt_drift_caught_by_short_window() {
        let mut fhddms = FhddmsDetector::new(FhddmsParameters::default()).unwrap();
        for _ in 0..200 {
            assert!(!fhddms.run(true).drift);
        }
        // short window bound for n = 25 is ~0.526: 14 errors in the last 25 suffice
        let drift_at = (0..25).position(|_| fhddms.run(false).drift);
        assert_eq!(drift_at, Some(13));
    }

    #[test]
    fn test_no_signal_until_window_full() {
        let mut fhddms = FhddmsDetector::new(FhddmsParameters { m: 2, n: 10, delta: 0.1 }).unwrap();
        for i in 0..19 {
            assert_eq!(fhddms.run(i < 5), Signal::NONE);
        }
        assert_eq!(fhddms.window_len(), 19);
    }

    #[test]
    fn test_settings() {
        let settings = FhddmsDetector::new(FhddmsParameters::default()).unwrap().settings();
        assert_eq!(settings.id, "25.100.1E-06");
    }
}
