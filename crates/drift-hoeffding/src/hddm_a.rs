//! HDDM.A.test (Hoeffding's bound based Drift Detection Method, A-test)
//!
//! Frías-Blanco et al., "Online and non-parametric drift detection methods
//! based on Hoeffding's bounds", IEEE TKDE 27(3), 2015.
//!
//! Keeps cumulative error counts and two cut points: the prefix with the
//! lowest upper bound on the error rate and the prefix with the highest lower
//! bound. Drift is signalled when the mean error since the low cut point has
//! increased by more than the Hoeffding bound for the two sample sizes.

use drift_core::{check_probability, format_value, DetectorSettings, DriftDetector, Result, Signal};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Which changes of the error rate are monitored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestType {
    /// Only increments of the error rate
    OneSided,
    /// Increments are signalled, decrements silently restart the statistics
    #[default]
    TwoSided,
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::OneSided => write!(f, "one-sided"),
            TestType::TwoSided => write!(f, "two-sided"),
        }
    }
}

/// HDDM.A parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HddmAParameters {
    /// Confidence level of the drift test
    pub drift_confidence: f64,
    /// Confidence level of the warning test
    pub warning_confidence: f64,
    pub test_type: TestType,
}

impl Default for HddmAParameters {
    fn default() -> Self {
        Self {
            drift_confidence: 0.001,
            warning_confidence: 0.005,
            test_type: TestType::TwoSided,
        }
    }
}

impl HddmAParameters {
    pub fn validate(&self) -> Result<()> {
        check_probability("drift_confidence", self.drift_confidence)?;
        check_probability("warning_confidence", self.warning_confidence)
    }
}

/// Cumulative error count up to some observation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CutPoint {
    n: u64,
    errors: u64,
}

impl CutPoint {
    fn mean(&self) -> f64 {
        self.errors as f64 / self.n as f64
    }

    fn bound(&self, ln_inv_conf: f64) -> f64 {
        ((1.0 / (2.0 * self.n as f64)) * ln_inv_conf).sqrt()
    }
}

/// HDDM.A detector
#[derive(Debug, Clone)]
pub struct HddmADetector {
    params: HddmAParameters,
    total: CutPoint,
    min: CutPoint,
    max: CutPoint,
}

impl HddmADetector {
    /// Create a new HDDM.A detector
    pub fn new(params: HddmAParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: HddmAParameters) -> Self {
        Self {
            params,
            total: CutPoint::default(),
            min: CutPoint::default(),
            max: CutPoint::default(),
        }
    }

    pub fn parameters(&self) -> &HddmAParameters {
        &self.params
    }

    /// Observations since the last drift or restart
    pub fn observations(&self) -> u64 {
        self.total.n
    }

    fn restart(&mut self) {
        self.total = CutPoint::default();
        self.min = CutPoint::default();
        self.max = CutPoint::default();
    }

    fn update_cut_points(&mut self) {
        if self.min.n == 0 {
            self.min = self.total;
        }
        if self.max.n == 0 {
            self.max = self.total;
        }

        let ln_inv_conf = (1.0 / self.params.drift_confidence).ln();
        let total_bound = self.total.bound(ln_inv_conf);
        if self.min.mean() + self.min.bound(ln_inv_conf) >= self.total.mean() + total_bound {
            self.min = self.total;
        }
        if self.max.mean() - self.max.bound(ln_inv_conf) <= self.total.mean() - total_bound {
            self.max = self.total;
        }
    }

    /// Hoeffding bound for the difference between the mean up to `cut` and the overall mean
    fn difference_bound(&self, cut: CutPoint, confidence: f64) -> f64 {
        let total_n = self.total.n as f64;
        let m = (total_n - cut.n as f64) / cut.n as f64 * (1.0 / total_n);
        (m / 2.0 * (2.0 / confidence).ln()).sqrt()
    }

    fn mean_increased(&self, confidence: f64) -> bool {
        if self.min.n == self.total.n {
            return false;
        }
        self.total.mean() - self.min.mean() >= self.difference_bound(self.min, confidence)
    }

    fn mean_decreased(&self) -> bool {
        if self.max.n == self.total.n {
            return false;
        }
        self.max.mean() - self.total.mean() >= self.difference_bound(self.max, self.params.drift_confidence)
    }
}

impl Default for HddmADetector {
    fn default() -> Self {
        Self::build(HddmAParameters::default())
    }
}

impl DriftDetector for HddmADetector {
    fn algorithm_name(&self) -> &'static str {
        "HDDM.A.test"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        self.total.n += 1;
        if !is_correct {
            self.total.errors += 1;
        }
        self.update_cut_points();

        let signal = if self.mean_increased(self.params.drift_confidence) {
            debug!(
                error_rate = self.total.mean(),
                min_error_rate = self.min.mean(),
                observations = self.total.n,
                "HDDM.A drift"
            );
            self.restart();
            Signal::DRIFT
        } else if self.mean_increased(self.params.warning_confidence) {
            Signal::WARNING
        } else {
            Signal::NONE
        };

        if self.params.test_type == TestType::TwoSided && self.mean_decreased() {
            self.restart();
        }
        signal
    }

    fn reset(&mut self) {
        self.restart();
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        DetectorSettings::new(
            format!(
                "{}.{}.{}",
                format_value(p.drift_confidence),
                format_value(p.warning_confidence),
                p.test_type
            ),
            format!(
                "$\\delta_d$:{}, $\\delta_w$:{}",
                format_value(p.drift_confidence),
                format_value(p.warning_confidence)
            ),
        )
    }
}
