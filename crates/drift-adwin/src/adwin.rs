//! ADWIN (ADaptive WINdowing)
//!
//! Bifet & Gavaldà, "Learning from time-changing data with adaptive
//! windowing", SDM 2007.
//!
//! Keeps a window of recent values compressed in an [`ExponentialHistogram`]
//! and, every [`CLOCK`] insertions, looks for a split into an older and a
//! newer sub-window whose means differ by more than the bound derived from
//! `delta`. When one is found the oldest bucket is dropped and the search
//! starts over, so the window shrinks until no split is significant.

use crate::histogram::{bucket_size, ExponentialHistogram};
use drift_core::{check_probability, format_value, DetectorSettings, DriftDetector, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Insertions between two cut searches
pub const CLOCK: u64 = 32;
/// Window width required before searching for a cut
pub const MIN_WINDOW_WIDTH: usize = 10;
/// Sub-window length offset used by the cut test
pub const MIN_SUB_WINDOW: usize = 5;

/// ADWIN parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdwinParameters {
    /// Confidence of the cut test
    pub delta: f64,
}

impl Default for AdwinParameters {
    fn default() -> Self {
        Self { delta: 0.002 }
    }
}

impl AdwinParameters {
    pub fn validate(&self) -> Result<()> {
        check_probability("delta", self.delta)
    }
}

/// Value-level ADWIN
#[derive(Debug, Clone)]
pub struct Adwin {
    delta: f64,
    histogram: ExponentialHistogram,
    time: u64,
    width: usize,
    total: f64,
    variance: f64,
}

impl Adwin {
    /// Create an empty window
    pub fn new(delta: f64) -> Result<Self> {
        check_probability("delta", delta)?;
        Ok(Self::empty(delta))
    }

    fn empty(delta: f64) -> Self {
        Self {
            delta,
            histogram: ExponentialHistogram::new(),
            time: 0,
            width: 0,
            total: 0.0,
            variance: 0.0,
        }
    }

    /// Add a value; returns `true` when the window was shrunk
    pub fn set_input(&mut self, value: f64) -> bool {
        self.time += 1;
        self.insert(value);
        if self.time % CLOCK != 0 || self.width <= MIN_WINDOW_WIDTH {
            return false;
        }

        let width_before = self.width;
        let mut changed = false;
        while self.has_cut() {
            self.delete_oldest();
            changed = true;
        }
        if changed {
            debug!(width_before, width = self.width, mean = self.mean(), "ADWIN window shrunk");
        }
        changed
    }

    /// Number of values in the window
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sum of the values in the window
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Variance sum of the window (not divided by the width)
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Mean of the window, `None` when it is empty
    pub fn mean(&self) -> Option<f64> {
        (self.width > 0).then(|| self.total / self.width as f64)
    }

    pub fn bucket_count(&self) -> usize {
        self.histogram.bucket_count()
    }

    pub fn row_count(&self) -> usize {
        self.histogram.row_count()
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Buckets summarising the window
    pub fn histogram(&self) -> &ExponentialHistogram {
        &self.histogram
    }

    fn insert(&mut self, value: f64) {
        self.width += 1;
        self.histogram.insert(value);
        if self.width > 1 {
            let previous = (self.width - 1) as f64;
            let deviation = value - self.total / previous;
            self.variance += previous * deviation * deviation / self.width as f64;
        }
        self.total += value;
    }

    fn delete_oldest(&mut self) {
        let Some((n1, bucket)) = self.histogram.remove_oldest() else {
            return;
        };
        self.width = self.width.saturating_sub(n1);
        self.total -= bucket.total;

        let size = n1 as f64;
        let u1 = bucket.total / size;
        let remaining = self.width as f64;
        let spread = if self.width > 0 {
            let d = u1 - self.total / remaining;
            size * remaining * d * d / (size + remaining)
        } else {
            0.0
        };
        self.variance = (self.variance - bucket.variance - spread).max(0.0);
    }

    /// Scan the split points from the oldest bucket for a significant cut
    fn has_cut(&self) -> bool {
        let mut n0 = 0usize;
        let mut n1 = self.width;
        let mut u0 = 0.0;
        let mut u1 = self.total;

        for (row_index, row) in self.histogram.rows().iter().enumerate().rev() {
            let size = bucket_size(row_index);
            for (k, bucket) in row.buckets().iter().enumerate() {
                n0 += size;
                n1 = n1.saturating_sub(size);
                u0 += bucket.total;
                u1 -= bucket.total;

                if row_index == 0 && k + 1 == row.len() {
                    return false;
                }
                if n0 > MIN_SUB_WINDOW + 1 && n1 > MIN_SUB_WINDOW + 1 && self.cut_expression(n0, n1, u0, u1) {
                    return true;
                }
            }
        }
        false
    }

    fn cut_expression(&self, n0: usize, n1: usize, u0: f64, u1: f64) -> bool {
        let (n0f, n1f) = (n0 as f64, n1 as f64);
        let diff = (u0 / n0f - u1 / n1f).abs();
        let offset = MIN_SUB_WINDOW as f64 - 1.0;
        let m = 1.0 / (n0f - offset) + 1.0 / (n1f - offset);
        let width = self.width as f64;
        let dd = (2.0 * width.ln() / self.delta).ln();
        let v = self.variance / width;
        let epsilon = (2.0 * m * v * dd).sqrt() + 2.0 / 3.0 * dd * m;
        diff > epsilon
    }
}

/// ADWIN detector over correctness values (1 for a correct prediction)
#[derive(Debug, Clone)]
pub struct AdwinDetector {
    params: AdwinParameters,
    adwin: Adwin,
}

impl AdwinDetector {
    #[instrument(level = "debug")]
    pub fn new(params: AdwinParameters) -> Result<Self> {
        params.validate()?;
        let adwin = Adwin::new(params.delta)?;
        Ok(Self { params, adwin })
    }

    pub fn parameters(&self) -> &AdwinParameters {
        &self.params
    }

    /// The underlying window
    pub fn adwin(&self) -> &Adwin {
        &self.adwin
    }
}

impl DriftDetector for AdwinDetector {
    fn algorithm_name(&self) -> &'static str {
        "ADWIN"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let value = if is_correct { 1.0 } else { 0.0 };
        Signal::drift_if(self.adwin.set_input(value))
    }

    fn reset(&mut self) {
        self.adwin = Adwin::empty(self.params.delta);
    }

    fn settings(&self) -> DetectorSettings {
        let delta = format_value(self.params.delta);
        DetectorSettings::new(delta.clone(), format!("$\\delta$:{delta}"))
    }

    fn minimum_sample_size(&self) -> usize {
        CLOCK as usize
    }
}
