//! Baseline that never signals

use drift_core::{DetectorSettings, DriftDetector, Signal};

/// A detector that never raises a warning or a drift
///
/// Running a learner paired with `NoDetection` gives the reference curve the
/// other detectors are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDetection;

impl DriftDetector for NoDetection {
    fn algorithm_name(&self) -> &'static str {
        "NO_DETECTION"
    }

    fn run(&mut self, _is_correct: bool) -> Signal {
        Signal::NONE
    }

    fn reset(&mut self) {}

    fn settings(&self) -> DetectorSettings {
        DetectorSettings::new("", "NO DETECTION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_signals() {
        let mut detector = NoDetection;
        for i in 0..1000 {
            assert_eq!(detector.run(i % 2 == 0), Signal::NONE);
        }
        assert_eq!(detector.settings().file_stem(detector.algorithm_name()), "NO_DETECTION");
    }
}
