//! CUSUM (Cumulative Sum) drift detection
//!
//! Page, "Continuous inspection schemes", Biometrika 1954.
//!
//! One-sided cumulative sum of the deviation of the error indicator from its
//! running mean, less an allowance `delta`, clipped at zero. Drift is raised
//! when the sum exceeds `lambda`.

use drift_core::{check_positive, check_size, format_value, DetectorSettings, DriftDetector, Error, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// CUSUM parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CusumParameters {
    /// Observations required before drift can be signalled
    pub min_instance: usize,
    /// Allowance subtracted from each deviation
    pub delta: f64,
    /// Detection threshold on the cumulative sum
    pub lambda: f64,
}

impl Default for CusumParameters {
    fn default() -> Self {
        Self {
            min_instance: 30,
            delta: 0.005,
            lambda: 50.0,
        }
    }
}

impl CusumParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("min_instance", self.min_instance)?;
        check_positive("lambda", self.lambda)?;
        if !(self.delta.is_finite() && self.delta >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "delta = {} must be finite and non-negative",
                self.delta
            )));
        }
        Ok(())
    }
}

/// CUSUM drift detector
#[derive(Debug, Clone)]
pub struct CusumDetector {
    params: CusumParameters,
    m_n: usize,
    mean: f64,
    sum: f64,
}

impl CusumDetector {
    /// Create a new CUSUM detector
    pub fn new(params: CusumParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: CusumParameters) -> Self {
        Self {
            params,
            m_n: 1,
            mean: 0.0,
            sum: 0.0,
        }
    }

    pub fn parameters(&self) -> &CusumParameters {
        &self.params
    }

    /// Current value of the cumulative sum
    pub fn statistic(&self) -> f64 {
        self.sum
    }
}

impl Default for CusumDetector {
    fn default() -> Self {
        Self::build(CusumParameters::default())
    }
}

impl DriftDetector for CusumDetector {
    fn algorithm_name(&self) -> &'static str {
        "CUSUM"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let error = if is_correct { 0.0 } else { 1.0 };

        self.mean += (error - self.mean) / self.m_n as f64;
        self.sum = (self.sum + error - self.mean - self.params.delta).max(0.0);
        self.m_n += 1;

        if self.m_n >= self.params.min_instance && self.sum > self.params.lambda {
            debug!(sum = self.sum, lambda = self.params.lambda, "CUSUM drift");
            return Signal::DRIFT;
        }
        Signal::NONE
    }

    fn reset(&mut self) {
        *self = Self::build(self.params.clone());
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        DetectorSettings::new(
            format!("{}.{}.{}", p.min_instance, format_value(p.delta), format_value(p.lambda)),
            format!(
                "$n_{{min}}$:{}, $\\delta$:{}, $\\lambda$:{}",
                p.min_instance,
                format_value(p.delta),
                format_value(p.lambda)
            ),
        )
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_instance.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cusum_detection() {
        let params = CusumParameters {
            lambda: 5.0,
            ..Default::default()
        };
        let mut cusum = CusumDetector::new(params).unwrap();

        // 10% error rate, then sustained errors
        for i in 0..500 {
            assert!(!cusum.run(i % 10 != 0).drift, "false alarm at {i}");
        }
        let detected = (0..100).position(|_| cusum.run(false).drift);
        assert!(detected.is_some());
        assert!(detected.unwrap() < 20);
    }

    #[test]
    fn test_sum_is_clipped_at_zero() {
        let mut cusum = CusumDetector::default();
        for _ in 0..100 {
            cusum.run(true);
            assert!(cusum.statistic() >= 0.0);
        }
        assert_eq!(cusum.statistic(), 0.0);
    }

    #[test]
    fn test_settings() {
        let settings = CusumDetector::default().settings();
        assert_eq!(settings.id, "30.0.005.50");
    }

    #[test]
    fn test_invalid_parameters() {
        let params = CusumParameters {
            lambda: 0.0,
            ..Default::default()
        };
        assert!(CusumDetector::new(params).is_err());
        let params = CusumParameters {
            delta: -1.0,
            ..Default::default()
        };
        assert!(CusumDetector::new(params).is_err());
    }
}
