//! FHDDMS.add (Additive Stacking Fast Hoeffding Drift Detection Method)
//!
//! Same tests as [`crate::FhddmsDetector`], but instead of holding every
//! observation it keeps one running count of correct predictions per
//! sub-window. The short window is tested each time a sub-window is
//! completed, the long window each time the stack is full.
//!
//! During the first round, while the stack fills up, observation `c` is
//! counted in sub-window `c / n` (clamped to the last one), so the first
//! sub-window receives `n - 1` observations and the last one `n + 1`. After
//! the first rotation every sub-window holds exactly `n`.

use crate::fhddms::{FhddmsParameters, StackedBounds};
use drift_core::{DetectorSettings, DriftDetector, Result, Signal};
use std::collections::VecDeque;
use tracing::debug;

/// FHDDMS.add detector
#[derive(Debug, Clone)]
pub struct FhddmsAddDetector {
    params: FhddmsParameters,
    bounds: StackedBounds,
    stack: VecDeque<usize>,
    first_round: bool,
    counter: usize,
    ones: usize,
    mu_max_short: f64,
    mu_max_long: f64,
}

impl FhddmsAddDetector {
    /// Create a new FHDDMS.add detector
    pub fn new(params: FhddmsParameters) -> Result<Self> {
        params.validate()?;
        let bounds = StackedBounds::new(&params)?;
        Ok(Self {
            stack: VecDeque::from(vec![0; params.m]),
            params,
            bounds,
            first_round: true,
            counter: 0,
            ones: 0,
            mu_max_short: 0.0,
            mu_max_long: 0.0,
        })
    }

    pub fn parameters(&self) -> &FhddmsParameters {
        &self.params
    }

    /// Correct-prediction count of every sub-window, oldest first
    pub fn stack(&self) -> impl Iterator<Item = usize> + '_ {
        self.stack.iter().copied()
    }

    /// Observations currently covered by the stack
    pub fn covered(&self) -> usize {
        self.counter
    }

    fn active_index(&self) -> usize {
        let last = self.params.m - 1;
        if self.first_round {
            (self.counter / self.params.n).min(last)
        } else {
            last
        }
    }
}

impl DriftDetector for FhddmsAddDetector {
    fn algorithm_name(&self) -> &'static str {
        "FHDDMS.add"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let n = self.params.n;
        let long = self.params.long_window();

        self.counter += 1;
        if self.counter == long + 1 {
            // evict the oldest sub-window and open a fresh one
            self.counter -= n;
            self.ones -= self.stack.pop_front().unwrap_or(0);
            self.stack.push_back(0);
            self.first_round = false;
        }

        let index = self.active_index();
        if is_correct {
            self.stack[index] += 1;
            self.ones += 1;
        }

        if self.counter % n == 0 {
            let mu_short = self.stack[index] as f64 / n as f64;
            if self.mu_max_short < mu_short {
                self.mu_max_short = mu_short;
            }
            if self.mu_max_short - mu_short > self.bounds.short {
                debug!(mu_short, mu_max = self.mu_max_short, "FHDDMS.add short window drift");
                return Signal::DRIFT;
            }
        }

        if self.counter == long {
            let mu_long = self.ones as f64 / long as f64;
            if self.mu_max_long < mu_long {
                self.mu_max_long = mu_long;
            }
            if self.mu_max_long - mu_long > self.bounds.long {
                debug!(mu_long, mu_max = self.mu_max_long, "FHDDMS.add long window drift");
                return Signal::DRIFT;
            }
        }
        Signal::NONE
    }

    fn reset(&mut self) {
        self.stack.iter_mut().for_each(|count| *count = 0);
        self.first_round = true;
        self.counter = 0;
        self.ones = 0;
        self.mu_max_short = 0.0;
        self.mu_max_long = 0.0;
    }

    fn settings(&self) -> DetectorSettings {
        let p = &self.params;
        let mut settings = p.settings();
        settings.id = format!("{}.{}.{}", p.m, p.n, drift_core::format_value(p.delta));
        settings
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.n
    }
}
