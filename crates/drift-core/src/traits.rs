//! Core traits for streaming drift detection
//!
//! Every detector consumes one boolean observation at a time ("was the most
//! recent prediction correct") and answers with a [`Signal`]. Detectors are
//! independent state machines: nothing is shared between instances, so a
//! harness running several (learner, detector) pairs owns one detector per pair.

use crate::types::{DetectorSettings, Signal};

/// The detector contract
///
/// Implementations must never panic for any sequence of boolean inputs. When a
/// statistic cannot be computed yet (empty window, zero counts) `run` returns
/// [`Signal::NONE`].
pub trait DriftDetector {
    /// Short, stable algorithm name (`"DDM"`, `"ADWIN"`, ...)
    fn algorithm_name(&self) -> &'static str;

    /// Process one observation
    ///
    /// `is_correct` is `true` when the paired classifier predicted the record
    /// correctly. Error-rate based detectors invert it internally.
    fn run(&mut self, is_correct: bool) -> Signal;

    /// Restore the post-construction state
    ///
    /// After `reset` the detector must be indistinguishable, in its future
    /// outputs, from a freshly constructed one with the same configuration.
    fn reset(&mut self);

    /// Identifier and label derived from the configuration
    fn settings(&self) -> DetectorSettings;

    /// Name shown in reports, defaults to [`DriftDetector::algorithm_name`]
    fn display_name(&self) -> String {
        self.algorithm_name().to_string()
    }

    /// Minimum number of observations before a drift can be signalled
    fn minimum_sample_size(&self) -> usize {
        1
    }
}

impl<D: DriftDetector + ?Sized> DriftDetector for Box<D> {
    fn algorithm_name(&self) -> &'static str {
        (**self).algorithm_name()
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        (**self).run(is_correct)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn settings(&self) -> DetectorSettings {
        (**self).settings()
    }

    fn display_name(&self) -> String {
        (**self).display_name()
    }

    fn minimum_sample_size(&self) -> usize {
        (**self).minimum_sample_size()
    }
}

/// Feed a whole sequence and collect the signals
pub fn run_sequence<D: DriftDetector + ?Sized>(detector: &mut D, observations: &[bool]) -> Vec<Signal> {
    observations.iter().map(|&obs| detector.run(obs)).collect()
}
