//! RDDM (Reactive Drift Detection Method)
//!
//! Barros et al., "RDDM: Reactive drift detection method", Expert Systems
//! with Applications, 2017.
//!
//! A DDM variant that keeps the last `min_size_stable_concept` error
//! indicators in a ring buffer. After a drift the statistics are rebuilt by
//! replaying the buffered observations from the start of the warning zone
//! (or just the drifting observation when there was no warning), so the
//! detector does not have to relearn the new concept from scratch. Long
//! stable concepts are truncated the same way once they exceed
//! `max_size_concept`.

use crate::UNSET;
use drift_core::{check_positive, check_size, DetectorSettings, DriftDetector, Error, Result, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// RDDM parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RddmParameters {
    /// Observations required before any signal
    pub min_instance: usize,
    /// Warning multiplier of `s_min`
    pub warning_level: f64,
    /// Drift multiplier of `s_min`
    pub drift_level: f64,
    /// Concept length after which the statistics are rebuilt from the buffer
    pub max_size_concept: usize,
    /// Capacity of the replay buffer
    pub min_size_stable_concept: usize,
    /// Observations a warning may last before it is promoted to a drift
    pub warn_limit: usize,
}

impl Default for RddmParameters {
    fn default() -> Self {
        Self {
            min_instance: 129,
            warning_level: 1.773,
            drift_level: 2.258,
            max_size_concept: 40_000,
            min_size_stable_concept: 7_000,
            warn_limit: 1_400,
        }
    }
}

impl RddmParameters {
    pub fn validate(&self) -> Result<()> {
        check_size("min_instance", self.min_instance)?;
        check_size("min_size_stable_concept", self.min_size_stable_concept)?;
        check_size("max_size_concept", self.max_size_concept)?;
        check_positive("warning_level", self.warning_level)?;
        check_positive("drift_level", self.drift_level)?;
        if self.warning_level > self.drift_level {
            return Err(Error::InvalidParameter(format!(
                "warning_level {} must not exceed drift_level {}",
                self.warning_level, self.drift_level
            )));
        }
        Ok(())
    }
}

/// Ring buffer of the most recent error indicators
#[derive(Debug, Clone)]
struct ReplayBuffer {
    slots: Vec<bool>,
    len: usize,
    first: usize,
    last: Option<usize>,
}

impl ReplayBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![false; capacity],
            len: 0,
            first: 0,
            last: None,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn wrap(&self, index: usize) -> usize {
        index % self.capacity()
    }

    /// Store an observation; returns true when the oldest one was overwritten
    fn push(&mut self, error: bool) -> bool {
        let last = self.last.map_or(0, |last| self.wrap(last + 1));
        self.last = Some(last);
        self.slots[last] = error;
        if self.len < self.capacity() {
            self.len += 1;
            false
        } else {
            self.first = self.wrap(self.first + 1);
            true
        }
    }

    /// Keep only the most recent observation
    fn keep_last(&mut self) {
        if let Some(last) = self.last {
            self.first = last;
            self.len = 1;
        }
    }

    /// Keep the observations from `start` up to the most recent one
    fn keep_from(&mut self, start: usize) {
        let Some(last) = self.last else {
            return;
        };
        self.first = start;
        let span = last as isize - start as isize + 1;
        self.len = if span <= 0 {
            (span + self.capacity() as isize) as usize
        } else {
            span as usize
        };
    }

    /// Buffered observations, oldest first
    fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.slots[self.wrap(self.first + i)])
    }
}

/// RDDM detector
#[derive(Debug, Clone)]
pub struct RddmDetector {
    params: RddmParameters,
    m_n: usize,
    m_p: f64,
    m_s: f64,
    m_p_min: f64,
    m_s_min: f64,
    m_p_s_min: f64,
    buffer: ReplayBuffer,
    // buffer position and instance number where the current warning started
    last_warn_pos: Option<usize>,
    last_warn_inst: Option<usize>,
    inst_num: usize,
    rebuild_pending: bool,
    is_change_detected: bool,
    is_warning_zone: bool,
}

impl RddmDetector {
    /// Create a new RDDM detector
    pub fn new(params: RddmParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: RddmParameters) -> Self {
        let buffer = ReplayBuffer::new(params.min_size_stable_concept);
        Self {
            params,
            m_n: 1,
            m_p: 1.0,
            m_s: 0.0,
            m_p_min: UNSET,
            m_s_min: UNSET,
            m_p_s_min: UNSET,
            buffer,
            last_warn_pos: None,
            last_warn_inst: None,
            inst_num: 0,
            rebuild_pending: false,
            is_change_detected: false,
            is_warning_zone: false,
        }
    }

    pub fn parameters(&self) -> &RddmParameters {
        &self.params
    }

    /// Number of observations held in the replay buffer
    pub fn buffered(&self) -> usize {
        self.buffer.len
    }

    /// Current error-rate estimate
    pub fn error_rate(&self) -> f64 {
        self.m_p
    }

    /// Observations behind the current statistics
    pub fn concept_length(&self) -> usize {
        self.m_n - 1
    }

    /// Whether the last observation fell in the warning zone
    pub fn in_warning_zone(&self) -> bool {
        self.is_warning_zone
    }

    /// `(p_min, s_min)` checkpoint, `None` until one has been recorded
    pub fn minimum(&self) -> Option<(f64, f64)> {
        (self.m_p_s_min < UNSET).then_some((self.m_p_min, self.m_s_min))
    }

    /// Restart the running statistics; the minimum is only forgotten after a real drift
    fn restart_statistics(&mut self) {
        self.m_n = 1;
        self.m_p = 1.0;
        self.m_s = 0.0;
        if self.is_change_detected {
            self.m_p_min = UNSET;
            self.m_s_min = UNSET;
            self.m_p_s_min = UNSET;
        }
    }

    /// Rewind to the warning boundary and replay the buffered observations
    fn rebuild_from_buffer(&mut self) {
        self.restart_statistics();
        if let Some(warn_pos) = self.last_warn_pos {
            self.buffer.keep_from(warn_pos);
        }

        let replay: Vec<bool> = self.buffer.iter().collect();
        for error in replay {
            self.m_p += (f64::from(u8::from(error)) - self.m_p) / self.m_n as f64;
            self.m_s = (self.m_p * (1.0 - self.m_p) / self.m_n as f64).max(0.0).sqrt();
            if self.is_change_detected
                && self.m_n > self.params.min_instance
                && self.m_p + self.m_s < self.m_p_s_min
            {
                self.m_p_min = self.m_p;
                self.m_s_min = self.m_s;
                self.m_p_s_min = self.m_p + self.m_s;
            }
            self.m_n += 1;
        }

        self.last_warn_pos = None;
        self.last_warn_inst = None;
        self.rebuild_pending = false;
        self.is_change_detected = false;
    }

    fn signal_drift(&mut self) -> Signal {
        self.is_change_detected = true;
        self.rebuild_pending = true;
        debug!(p = self.m_p, s = self.m_s, p_min = self.m_p_min, s_min = self.m_s_min, "RDDM drift");
        Signal::DRIFT
    }
}

impl Default for RddmDetector {
    fn default() -> Self {
        Self::build(RddmParameters::default())
    }
}

impl DriftDetector for RddmDetector {
    fn algorithm_name(&self) -> &'static str {
        "RDDM"
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        let error = !is_correct;

        if self.rebuild_pending {
            self.rebuild_from_buffer();
        }

        if self.buffer.push(error) && self.last_warn_pos == self.buffer.last {
            self.last_warn_pos = None;
        }

        let e = f64::from(u8::from(error));
        self.m_p += (e - self.m_p) / self.m_n as f64;
        self.m_s = (self.m_p * (1.0 - self.m_p) / self.m_n as f64).max(0.0).sqrt();

        self.inst_num += 1;
        self.m_n += 1;
        self.is_warning_zone = false;

        if self.m_n <= self.params.min_instance {
            return Signal::NONE;
        }

        if self.m_p + self.m_s < self.m_p_s_min {
            self.m_p_min = self.m_p;
            self.m_s_min = self.m_s;
            self.m_p_s_min = self.m_p + self.m_s;
        }

        let level = self.m_p + self.m_s;
        if level > self.m_p_min + self.params.drift_level * self.m_s_min {
            if self.last_warn_inst.is_none() {
                self.buffer.keep_last();
            }
            return self.signal_drift();
        }

        if level > self.m_p_min + self.params.warning_level * self.m_s_min {
            if let Some(warn_inst) = self.last_warn_inst {
                if warn_inst + self.params.warn_limit <= self.inst_num {
                    // warning lasted too long: treat it as a drift
                    self.buffer.keep_last();
                    self.last_warn_pos = None;
                    self.last_warn_inst = None;
                    return self.signal_drift();
                }
            }

            self.is_warning_zone = true;
            if self.last_warn_inst.is_none() {
                self.last_warn_inst = Some(self.inst_num);
                self.last_warn_pos = self.buffer.last;
            }
            return Signal::WARNING;
        }

        self.last_warn_inst = None;
        self.last_warn_pos = None;

        if self.m_n > self.params.max_size_concept {
            // stable concept grew too long: rebuild from the buffer on the next call
            self.rebuild_pending = true;
        }
        Signal::NONE
    }

    fn reset(&mut self) {
        *self = Self::build(self.params.clone());
    }

    fn settings(&self) -> DetectorSettings {
        let n = self.params.min_instance;
        DetectorSettings::new(n.to_string(), format!("$n_{{min}}$:{n}"))
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_params() -> RddmParameters {
        RddmParameters {
            min_instance: 30,
            max_size_concept: 400,
            min_size_stable_concept: 100,
            warn_limit: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_replay_buffer_wraps() {
        let mut buffer = ReplayBuffer::new(4);
        for i in 0..6 {
            buffer.push(i % 2 == 0);
        }
        assert_eq!(buffer.len, 4);
        assert_eq!(buffer.first, 2);
        assert_eq!(buffer.last, Some(1));
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![true, false, true, false]);

        // warning started at slot 3: keeps slots 3, 0, 1
        buffer.keep_from(3);
        assert_eq!(buffer.len, 3);
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![false, true, false]);

        buffer.keep_last();
        assert_eq!(buffer.len, 1);
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![false]);
    }

    #[test]
    fn test_detects_error_burst() {
        let mut rddm = RddmDetector::new(small_params()).unwrap();
        for i in 0..300 {
            assert!(!rddm.run(i % 10 != 0).drift);
        }
        let drifted = (0..200).any(|_| rddm.run(false).drift);
        assert!(drifted);
    }

    #[test]
    fn test_replay_after_drift_rebuilds_from_buffer() {
        let mut rddm = RddmDetector::new(small_params()).unwrap();
        for i in 0..300 {
            rddm.run(i % 10 != 0);
        }
        let mut steps = 0;
        while !rddm.run(false).drift {
            steps += 1;
            assert!(steps < 200, "no drift raised");
        }
        // the next call rewinds to the warning boundary and replays from there
        rddm.run(false);
        assert!(rddm.buffered() < 100);
        assert_eq!(rddm.concept_length(), rddm.buffered());
        // replayed statistics come from the error burst only
        assert!(rddm.error_rate() > 0.5);
    }

    /// Detector right after a drift whose warning started at buffer slot 2
    fn drifted_with_buffer(min_instance: usize, errors: &[bool]) -> RddmDetector {
        let mut rddm = RddmDetector::new(RddmParameters {
            min_instance,
            ..small_params()
        })
        .unwrap();
        for &error in errors {
            rddm.buffer.push(error);
        }
        rddm.m_p_min = 0.05;
        rddm.m_s_min = 0.01;
        rddm.m_p_s_min = 0.06;
        rddm.last_warn_pos = Some(2);
        rddm.is_change_detected = true;
        rddm.rebuild_pending = true;
        rddm
    }

    #[test]
    fn test_long_replay_installs_minimum_from_replayed_statistics() {
        // replays slots 2..8: two errors, then four correct predictions
        let errors = [false, false, true, true, false, false, false, false];
        let mut rddm = drifted_with_buffer(3, &errors);
        rddm.rebuild_from_buffer();

        assert_eq!(rddm.buffered(), 6);
        assert_eq!(rddm.concept_length(), 6);
        assert!(!rddm.is_change_detected);
        // p+s falls on every step past min_instance, last one wins: p = 1/3, s = sqrt(p(1-p)/6)
        let (p_min, s_min) = rddm.minimum().unwrap();
        assert_relative_eq!(p_min, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(s_min, (1.0f64 / 27.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(rddm.m_p_s_min, p_min + s_min, epsilon = 1e-12);
    }

    #[test]
    fn test_replay_no_longer_than_min_instance_leaves_minimum_unset() {
        let errors = [false, false, true, true, false, false, false, false];
        let mut rddm = drifted_with_buffer(6, &errors);
        rddm.rebuild_from_buffer();

        assert_eq!(rddm.concept_length(), 6);
        assert_eq!(rddm.minimum(), None);

        // the next observation is the first one past min_instance
        rddm.run(true);
        let (p_min, _) = rddm.minimum().unwrap();
        assert_relative_eq!(p_min, 2.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_replay_clears_minimum() {
        let mut rddm = RddmDetector::new(small_params()).unwrap();
        for i in 0..300 {
            rddm.run(i % 10 != 0);
        }
        while !rddm.run(false).drift {}
        // replay covers fewer than min_instance observations: the checkpoint is cleared
        rddm.run(false);
        assert_eq!(rddm.minimum(), None);
    }

    #[test]
    fn test_long_concept_is_truncated() {
        let mut rddm = RddmDetector::new(small_params()).unwrap();
        for i in 0..400 {
            assert!(!rddm.run(i % 10 != 0).drift, "false alarm at {i}");
        }
        assert_eq!(rddm.concept_length(), 400);
        let minimum = rddm.minimum();
        assert!(minimum.is_some());

        // rebuilt from the 100 buffered observations, checkpoint kept
        rddm.run(true);
        assert_eq!(rddm.concept_length(), 101);
        assert_eq!(rddm.buffered(), 100);
        assert_eq!(rddm.minimum(), minimum);
        assert!((rddm.error_rate() - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_validation() {
        let params = RddmParameters {
            warning_level: 3.0,
            drift_level: 2.0,
            ..Default::default()
        };
        assert!(RddmDetector::new(params).is_err());
        let params = RddmParameters {
            min_size_stable_concept: 0,
            ..Default::default()
        };
        assert!(RddmDetector::new(params).is_err());
    }
}
