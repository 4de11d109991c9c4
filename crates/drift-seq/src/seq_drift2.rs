//! SeqDrift2
//!
//! Pears, Sakthithasan & Koh, "Detecting concept change in dynamic data
//! streams", Machine Learning 97(3), 2014.
//!
//! Values are collected in a right repository of one block. At every block
//! boundary the block is compared against a left reservoir, a uniform sample
//! of the stream since the last drift, using a Bernstein bound whose
//! parameter `k` (the share of the sample taken from the right side) is
//! optimised on the fly. On drift the left reservoir is emptied; in every
//! case the right block then moves into the left reservoir.

use crate::reservoir::Reservoir;
use drift_core::{check_probability, check_size, format_value, DetectorSettings, DriftDetector, Result, Signal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Initial share of the right repository in the combined sample
const INITIAL_K: f64 = 0.5;
/// Relative improvement below which the optimisation of `k` stops
const OPTIMIZATION_TOLERANCE: f64 = 1e-4;
const MAX_OPTIMIZATION_STEPS: usize = 200;
/// Variance used when the sample has none
const VARIANCE_FLOOR: f64 = 0.0001;

/// SeqDrift2 parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqDrift2Parameters {
    /// Significance level of the test
    pub delta: f64,
    /// Values per block; also the size of the right repository
    pub block_size: usize,
    /// Seed of the reservoir sampling generator
    pub seed: u64,
}

impl Default for SeqDrift2Parameters {
    fn default() -> Self {
        Self {
            delta: 0.01,
            block_size: 200,
            seed: 0,
        }
    }
}

impl SeqDrift2Parameters {
    pub fn validate(&self) -> Result<()> {
        check_probability("delta", self.delta)?;
        check_size("block_size", self.block_size)
    }
}

/// Value-level SeqDrift2
#[derive(Debug, Clone)]
pub struct SeqDrift2 {
    delta: f64,
    block_size: usize,
    rng: ChaCha8Rng,
    left: Reservoir,
    right: Reservoir,
    instances: u64,
    epsilon: f64,
}

impl SeqDrift2 {
    pub fn new(delta: f64, block_size: usize, seed: u64) -> Result<Self> {
        SeqDrift2Parameters {
            delta,
            block_size,
            seed,
        }
        .validate()?;
        Ok(Self::empty(delta, block_size, seed))
    }

    fn empty(delta: f64, block_size: usize, seed: u64) -> Self {
        Self {
            delta,
            block_size,
            rng: ChaCha8Rng::seed_from_u64(seed),
            left: Reservoir::new(block_size, block_size),
            right: Reservoir::new(block_size, block_size),
            instances: 0,
            epsilon: 0.0,
        }
    }

    /// Add a value; returns `true` when a drift was detected at this block boundary
    pub fn set_input(&mut self, value: f64) -> bool {
        self.instances += 1;
        self.right.add(value, &mut self.rng);

        if self.instances % self.block_size as u64 != 0 {
            return false;
        }

        let drift = self.is_drift();
        if drift {
            debug!(
                instances = self.instances,
                left_mean = ?self.left.mean(),
                right_mean = ?self.right.mean(),
                epsilon = self.epsilon,
                "SeqDrift2 drift"
            );
            self.left.clear();
        }
        self.left.absorb(&mut self.right, &mut self.rng);
        drift
    }

    /// Values held by both sides
    pub fn width(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn left_mean(&self) -> Option<f64> {
        self.left.mean()
    }

    pub fn right_mean(&self) -> Option<f64> {
        self.right.mean()
    }

    pub fn left_len(&self) -> usize {
        self.left.len()
    }

    pub fn right_len(&self) -> usize {
        self.right.len()
    }

    /// Capacity of the left reservoir chosen by the last optimisation
    pub fn left_capacity(&self) -> usize {
        self.left.max_size()
    }

    /// Bound used by the last test
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Mean over both sides, `None` when both are empty
    pub fn estimation(&self) -> Option<f64> {
        drift_core::bounds::ratio(self.left.total() + self.right.total(), self.width()).ok()
    }

    fn is_drift(&mut self) -> bool {
        if self.width() <= self.block_size {
            return false;
        }
        let (Some(left_mean), Some(right_mean)) = (self.left.mean(), self.right.mean()) else {
            return false;
        };
        self.optimize_epsilon(left_mean, right_mean);
        self.instances > self.block_size as u64 && self.epsilon <= (right_mean - left_mean).abs()
    }

    /// Variance of the combined sample, treating values as Bernoulli outcomes
    fn variance(&self) -> f64 {
        let width = self.width() as f64;
        let total = self.left.total() + self.right.total();
        let mean = total / width;
        let x = total * (mean - 1.0) * (mean - 1.0) + (width - total) * mean * mean;
        x / (width - 1.0)
    }

    fn bernstein_epsilon(&self, x: f64, variance: f64, k: f64) -> f64 {
        let right_size = self.block_size as f64;
        let root = (x * x + 18.0 * right_size * x * variance).sqrt();
        (x + root) / (3.0 * right_size * (1.0 - k))
    }

    fn optimize_epsilon(&mut self, left_mean: f64, right_mean: f64) {
        let tests = self.left.len() as f64 / self.block_size as f64;
        if tests < 1.0 {
            return;
        }
        let mut variance = self.variance();
        if variance == 0.0 {
            variance = VARIANCE_FLOOR;
        }

        // the significance is split across the sequence of tests
        let delta_dash = self.delta / (2.0 * (1.0 - 0.5f64.powf(tests)));
        let x = (4.0 / delta_dash).ln();

        let mut k = INITIAL_K;
        for _ in 0..MAX_OPTIMIZATION_STEPS {
            let previous = self.bernstein_epsilon(x, variance, k);
            k = 3.0 * k / 4.0;
            let current = self.bernstein_epsilon(x, variance, k);
            if (previous - current) / previous < OPTIMIZATION_TOLERANCE {
                break;
            }
        }
        k = 4.0 * k / 3.0;

        let mean_increase = right_mean - left_mean;
        if mean_increase > 0.0 {
            k += (1.0 - mean_increase.powi(4)) * k;
        }

        let right_size = self.block_size as f64;
        let capacity = (right_size * (1.0 - k) / k).max(0.0) as usize;
        self.left.set_max_size(capacity);
        self.epsilon = self.bernstein_epsilon(x, variance, k);
        trace!(tests, variance, k, capacity, epsilon = self.epsilon, "SeqDrift2 epsilon optimised");
    }
}

/// SeqDrift2 detector over correctness values (1 for a correct prediction)
#[derive(Debug, Clone)]
pub struct SeqDrift2Detector {
    params: SeqDrift2Parameters,
    inner: SeqDrift2,
}

impl SeqDrift2Detector {
    #[instrument(level = "debug")]
    pub fn new(params: SeqDrift2Parameters) -> Result<Self> {
        let inner = SeqDrift2::new(params.delta, params.block_size, params.seed)?;
        Ok(Self { params, inner })
    }

    pub fn parameters(&self) -> &SeqDrift2Parameters {
        &self.params
    }

    pub fn inner(&self) -> &SeqDrift2 {
        &self.inner
    }
}

impl DriftDetector for SeqDrift2Detector {
    fn algorithm_name(&self) -> &'static str {
        "SeqDrift2"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let value = if is_correct { 1.0 } else { 0.0 };
        Signal::drift_if(self.inner.set_input(value))
    }

    fn reset(&mut self) {
        let p = &self.params;
        self.inner = SeqDrift2::empty(p.delta, p.block_size, p.seed);
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        DetectorSettings::new(
            format!("{}.{}", format_value(p.delta), p.block_size),
            format!("$\\delta$:{}, $s$:{}", format_value(p.delta), p.block_size),
        )
    }

    fn minimum_sample_size(&self) -> usize {
        2 * self.params.block_size
    }
}
