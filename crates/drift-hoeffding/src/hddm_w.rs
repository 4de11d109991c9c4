//! HDDM.W.test (Hoeffding's bound based Drift Detection Method, W-test)
//!
//! Frías-Blanco et al., "Online and non-parametric drift detection methods
//! based on Hoeffding's bounds", IEEE TKDE 27(3), 2015.
//!
//! The weighted variant of [`crate::HddmADetector`]: error rates are tracked
//! as exponentially weighted moving averages, and the McDiarmid bound uses
//! the sum of squared weights of each estimator.

use crate::hddm_a::TestType;
use drift_core::{check_probability, format_value, DetectorSettings, DriftDetector, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// HDDM.W parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HddmWParameters {
    /// Confidence level of the drift test
    pub drift_confidence: f64,
    /// Confidence level of the warning test
    pub warning_confidence: f64,
    /// Weight of the most recent observation in each EWMA
    pub lambda: f64,
    pub test_type: TestType,
}

impl Default for HddmWParameters {
    fn default() -> Self {
        Self {
            drift_confidence: 0.001,
            warning_confidence: 0.005,
            lambda: 0.05,
            test_type: TestType::OneSided,
        }
    }
}

impl HddmWParameters {
    pub fn validate(&self) -> Result<()> {
        check_probability("drift_confidence", self.drift_confidence)?;
        check_probability("warning_confidence", self.warning_confidence)?;
        check_probability("lambda", self.lambda)
    }
}

/// An EWMA estimator together with the sum of its squared weights
#[derive(Debug, Clone, Copy, PartialEq)]
struct EwmaSample {
    ewma: f64,
    bounded_sum: f64,
}

impl EwmaSample {
    fn first(value: f64) -> Self {
        Self {
            ewma: value,
            bounded_sum: 1.0,
        }
    }

    fn update(&mut self, value: f64, lambda: f64) {
        let decay = 1.0 - lambda;
        self.ewma = lambda * value + decay * self.ewma;
        self.bounded_sum = lambda * lambda + decay * decay * self.bounded_sum;
    }
}

fn push(sample: &mut Option<EwmaSample>, value: f64, lambda: f64) {
    match sample {
        Some(s) => s.update(value, lambda),
        None => *sample = Some(EwmaSample::first(value)),
    }
}

/// True when `later` exceeds `earlier` by more than the bound at `confidence`
fn mean_increment(earlier: Option<EwmaSample>, later: Option<EwmaSample>, confidence: f64) -> bool {
    let (Some(s1), Some(s2)) = (earlier, later) else {
        return false;
    };
    let bound = ((s1.bounded_sum + s2.bounded_sum) * (1.0 / confidence).ln() / 2.0).sqrt();
    s2.ewma - s1.ewma > bound
}

/// State of one direction of monitoring
#[derive(Debug, Clone, Copy, PartialEq)]
struct Monitor {
    cut_point: f64,
    before: Option<EwmaSample>,
    after: Option<EwmaSample>,
}

impl Monitor {
    fn new(cut_point: f64) -> Self {
        Self {
            cut_point,
            before: None,
            after: None,
        }
    }

    /// Move the cut point to `total`, forgetting the estimator after it
    fn cut(&mut self, cut_point: f64, total: EwmaSample) {
        self.cut_point = cut_point;
        self.before = Some(total);
        self.after = None;
    }
}

/// HDDM.W detector
#[derive(Debug, Clone)]
pub struct HddmWDetector {
    params: HddmWParameters,
    total: Option<EwmaSample>,
    incr: Monitor,
    decr: Monitor,
}

impl HddmWDetector {
    /// Create a new HDDM.W detector
    pub fn new(params: HddmWParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: HddmWParameters) -> Self {
        Self {
            params,
            total: None,
            incr: Monitor::new(f64::MAX),
            decr: Monitor::new(f64::MIN_POSITIVE),
        }
    }

    pub fn parameters(&self) -> &HddmWParameters {
        &self.params
    }

    /// Weighted error rate since the last drift, if any observation was seen
    pub fn error_estimate(&self) -> Option<f64> {
        self.total.map(|t| t.ewma)
    }

    fn reset_parameters(&mut self) {
        self.total = None;
        self.incr = Monitor::new(f64::MAX);
        self.decr = Monitor::new(f64::MIN_POSITIVE);
    }

    fn total_bound(&self) -> f64 {
        let sum = self.total.map_or(0.0, |t| t.bounded_sum);
        (sum * (1.0 / self.params.drift_confidence).ln() / 2.0).sqrt()
    }

    fn update_incr(&mut self, value: f64) {
        let bound = self.total_bound();
        match self.total {
            Some(total) if total.ewma + bound < self.incr.cut_point => self.incr.cut(total.ewma + bound, total),
            _ => push(&mut self.incr.after, value, self.params.lambda),
        }
    }

    fn update_decr(&mut self, value: f64) {
        let bound = self.total_bound();
        match self.total {
            Some(total) if total.ewma - bound > self.decr.cut_point => self.decr.cut(total.ewma - bound, total),
            _ => push(&mut self.decr.after, value, self.params.lambda),
        }
    }
}

impl Default for HddmWDetector {
    fn default() -> Self {
        Self::build(HddmWParameters::default())
    }
}

impl DriftDetector for HddmWDetector {
    fn algorithm_name(&self) -> &'static str {
        "HDDM.W.test"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let value = if is_correct { 0.0 } else { 1.0 };
        push(&mut self.total, value, self.params.lambda);

        self.update_incr(value);
        let signal = if mean_increment(self.incr.before, self.incr.after, self.params.drift_confidence) {
            debug!(error_estimate = ?self.error_estimate(), "HDDM.W drift");
            self.reset_parameters();
            Signal::DRIFT
        } else if mean_increment(self.incr.before, self.incr.after, self.params.warning_confidence) {
            Signal::WARNING
        } else {
            Signal::NONE
        };

        self.update_decr(value);
        if self.params.test_type == TestType::TwoSided
            && mean_increment(self.decr.after, self.decr.before, self.params.drift_confidence)
        {
            self.reset_parameters();
        }
        signal
    }

    fn reset(&mut self) {
        self.reset_parameters();
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        DetectorSettings::new(
            format!(
                "{}.{}.{}.{}",
                format_value(p.drift_confidence),
                format_value(p.warning_confidence),
                format_value(p.lambda),
                p.test_type
            ),
            format!(
                "$\\delta_d$:{}, $\\delta_w$:{}, $\\lambda$:{}",
                format_value(p.drift_confidence),
                format_value(p.warning_confidence),
                format_value(p.lambda)
            ),
        )
    }
}
