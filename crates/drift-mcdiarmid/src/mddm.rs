//! MDDM (McDiarmid Drift Detection Method)
//!
//! Pesaranghader, Viktor & Paquet, "McDiarmid drift detection methods for
//! evolving data streams", IJCNN 2018.
//!
//! Slides a window of `n` correctness values, computes their weighted mean
//! with weights growing toward the newest position, and signals drift when
//! the mean drops below its running maximum by more than the McDiarmid bound
//! `sqrt(0.5 * sigma * ln(1/delta))`, `sigma` being the sum of squared
//! normalised weights.

use crate::weights::{dispersion, WeightScheme};
use drift_core::{
    check_probability, check_size, format_value, mcdiarmid_bound, BoolWindow, DetectorSettings, DriftDetector,
    Result, Signal,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// MDDM parameters for any weight scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MddmParameters {
    /// Sliding window size
    pub n: usize,
    pub scheme: WeightScheme,
    /// Probability of a false alarm
    pub delta: f64,
}

impl MddmParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("n", self.n)?;
        self.scheme.validate()?;
        check_probability("delta", self.delta)
    }
}

/// MDDM.A parameters (arithmetic weights)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MddmAParameters {
    pub n: usize,
    /// Increment between consecutive weights
    pub difference: f64,
    pub delta: f64,
}

impl Default for MddmAParameters {
    fn default() -> Self {
        Self {
            n: 100,
            difference: 0.01,
            delta: 1e-6,
        }
    }
}

impl From<MddmAParameters> for MddmParameters {
    fn from(p: MddmAParameters) -> Self {
        Self {
            n: p.n,
            scheme: WeightScheme::Arithmetic { difference: p.difference },
            delta: p.delta,
        }
    }
}

/// MDDM.G parameters (geometric weights)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MddmGParameters {
    pub n: usize,
    /// Ratio between consecutive weights
    pub ratio: f64,
    pub delta: f64,
}

impl Default for MddmGParameters {
    fn default() -> Self {
        Self {
            n: 100,
            ratio: 1.01,
            delta: 1e-6,
        }
    }
}

impl From<MddmGParameters> for MddmParameters {
    fn from(p: MddmGParameters) -> Self {
        Self {
            n: p.n,
            scheme: WeightScheme::Geometric { ratio: p.ratio },
            delta: p.delta,
        }
    }
}

/// MDDM.E parameters (Euler weights)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MddmEParameters {
    pub n: usize,
    /// Exponent increment between consecutive weights
    pub lambda: f64,
    pub delta: f64,
}

impl Default for MddmEParameters {
    fn default() -> Self {
        Self {
            n: 100,
            lambda: 0.01,
            delta: 1e-6,
        }
    }
}

impl From<MddmEParameters> for MddmParameters {
    fn from(p: MddmEParameters) -> Self {
        Self {
            n: p.n,
            scheme: WeightScheme::Euler { lambda: p.lambda },
            delta: p.delta,
        }
    }
}

/// MDDM detector; the weight scheme selects the A, G or E variant
#[derive(Debug, Clone)]
pub struct MddmDetector {
    params: MddmParameters,
    weights: Vec<f64>,
    epsilon: f64,
    window: BoolWindow,
    u_max: f64,
}

impl MddmDetector {
    /// Create a new MDDM detector, precomputing weights and bound
    pub fn new(params: impl Into<MddmParameters>) -> Result<Self> {
        let params = params.into();
        params.validate()?;
        let weights = params.scheme.normalized_weights(params.n)?;
        let epsilon = mcdiarmid_bound(dispersion(&weights), params.delta)?;
        Ok(Self {
            window: BoolWindow::new(params.n),
            params,
            weights,
            epsilon,
            u_max: 0.0,
        })
    }

    pub fn parameters(&self) -> &MddmParameters {
        &self.params
    }

    /// McDiarmid bound used as the drift threshold
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    fn weighted_mean(&self) -> f64 {
        self.window
            .iter()
            .zip(&self.weights)
            .filter(|(ok, _)| *ok)
            .map(|(_, w)| w)
            .sum()
    }
}

impl DriftDetector for MddmDetector {
    fn algorithm_name(&self) -> &'static str {
        match self.params.scheme {
            WeightScheme::Arithmetic { .. } => "MDDM.A",
            WeightScheme::Geometric { .. } => "MDDM.G",
            WeightScheme::Euler { .. } => "MDDM.E",
        }
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        self.window.push(is_correct);
        if !self.window.is_full() {
            return Signal::NONE;
        }

        let u = self.weighted_mean();
        if u > self.u_max {
            self.u_max = u;
        }
        let drift = self.u_max - u > self.epsilon;
        if drift {
            debug!(
                algorithm = self.algorithm_name(),
                u,
                u_max = self.u_max,
                epsilon = self.epsilon,
                "MDDM drift"
            );
        }
        Signal::drift_if(drift)
    }

    fn reset(&mut self) {
        self.window.clear();
        self.u_max = 0.0;
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        let (symbol, value) = p.scheme.parameter();
        DetectorSettings::new(
            format!("{}.{}", p.n, format_value(p.delta)),
            format!(
                "$n$:{}, ${symbol}$:{}, $\\delta$:{}",
                p.n,
                format_value(value),
                format_value(p.delta)
            ),
        )
    }

    fn display_name(&self) -> String {
        format!("{}.{}", self.algorithm_name(), self.params.n)
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.n
    }
}
