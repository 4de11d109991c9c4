//! Runtime accounting around a detector

use crate::traits::DriftDetector;
use crate::types::{DetectorSettings, Signal};
use std::time::{Duration, Instant};

/// Elapsed processing time of a detector
///
/// `episode` covers the observations since the last reset, `total` covers the
/// whole run and is never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeCounters {
    episode: Duration,
    total: Duration,
}

impl RuntimeCounters {
    /// Add one measurement to both counters
    pub fn record(&mut self, elapsed: Duration) {
        self.episode += elapsed;
        self.total += elapsed;
    }

    /// Start a new episode
    pub fn reset_episode(&mut self) {
        self.episode = Duration::ZERO;
    }

    /// Time spent since the last reset
    pub fn episode(&self) -> Duration {
        self.episode
    }

    /// Time spent over the whole run
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Episode time in milliseconds
    pub fn episode_ms(&self) -> f64 {
        self.episode.as_secs_f64() * 1000.0
    }

    /// Total time in milliseconds
    pub fn total_ms(&self) -> f64 {
        self.total.as_secs_f64() * 1000.0
    }
}

/// A detector together with its runtime counters
///
/// This is the handle a harness drives: `detect` once per processed record,
/// `reset` right after a drift, together with the paired learner.
#[derive(Debug, Clone)]
pub struct TimedDetector<D> {
    detector: D,
    runtime: RuntimeCounters,
}

impl<D: DriftDetector> TimedDetector<D> {
    /// Wrap a detector with zeroed counters
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            runtime: RuntimeCounters::default(),
        }
    }

    /// Run the detector on one observation, accounting for the elapsed time
    pub fn detect(&mut self, is_correct: bool) -> Signal {
        let start = Instant::now();
        let signal = self.detector.run(is_correct);
        self.runtime.record(start.elapsed());
        signal
    }

    /// Reset detection state and the episode timer; the total timer keeps running
    pub fn reset(&mut self) {
        self.detector.reset();
        self.runtime.reset_episode();
    }

    /// Settings of the wrapped detector
    pub fn settings(&self) -> DetectorSettings {
        self.detector.settings()
    }

    /// Output file stem of the wrapped detector, built from its display name
    pub fn file_stem(&self) -> String {
        self.settings().file_stem(&self.detector.display_name())
    }

    pub fn runtime(&self) -> &RuntimeCounters {
        &self.runtime
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn into_inner(self) -> D {
        self.detector
    }
}

impl<D: DriftDetector> From<D> for TimedDetector<D> {
    fn from(detector: D) -> Self {
        Self::new(detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts calls; signals drift on every tenth observation
    #[derive(Debug, Default)]
    struct Counter {
        seen: usize,
    }

    impl DriftDetector for Counter {
        fn algorithm_name(&self) -> &'static str {
            "COUNTER"
        }

        fn run(&mut self, _is_correct: bool) -> Signal {
            self.seen += 1;
            Signal::drift_if(self.seen % 10 == 0)
        }

        fn reset(&mut self) {
            self.seen = 0;
        }

        fn settings(&self) -> DetectorSettings {
            DetectorSettings::new("10", "$n$:10")
        }
    }

    #[test]
    fn test_counters_record_and_reset() {
        let mut counters = RuntimeCounters::default();
        counters.record(Duration::from_millis(3));
        counters.record(Duration::from_millis(2));
        assert_eq!(counters.episode(), Duration::from_millis(5));
        assert_eq!(counters.total(), Duration::from_millis(5));

        counters.reset_episode();
        counters.record(Duration::from_millis(1));
        assert_eq!(counters.episode(), Duration::from_millis(1));
        assert_eq!(counters.total(), Duration::from_millis(6));
        assert!((counters.total_ms() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_keeps_total() {
        let mut timed = TimedDetector::new(Counter::default());
        for i in 1..=10 {
            let signal = timed.detect(true);
            assert_eq!(signal.drift, i == 10);
        }
        let total_before = timed.runtime().total();

        timed.reset();
        assert_eq!(timed.runtime().episode(), Duration::ZERO);
        assert_eq!(timed.runtime().total(), total_before);
        assert_eq!(timed.detector().seen, 0);
        assert_eq!(timed.file_stem(), "COUNTER.10");
    }
}
