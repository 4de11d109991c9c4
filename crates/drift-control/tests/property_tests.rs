//! Property-based tests for the control-chart detectors
//!
//! Streams are drawn from a seeded Bernoulli source so failures replay.

use drift_control::*;
use drift_core::{DriftDetector, Signal};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bernoulli_stream(seed: u64, accuracy: f64, len: usize) -> Vec<bool> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_bool(accuracy)).collect()
}

fn signals<D: DriftDetector>(detector: &mut D, stream: &[bool]) -> Vec<Signal> {
    stream.iter().map(|&ok| detector.run(ok)).collect()
}

proptest! {
    // Property: DDM drift is always accompanied by a warning
    #[test]
    fn prop_ddm_drift_implies_warning(seed in any::<u64>(), accuracy in 0.05..0.95f64) {
        let mut ddm = DdmDetector::default();
        let stream = bernoulli_stream(seed, accuracy, 1500);
        for signal in signals(&mut ddm, &stream) {
            prop_assert!(!signal.drift || signal.warning);
            if signal.drift {
                ddm.reset();
            }
        }
    }

    // Property: RDDM never buffers more than its stable concept size
    #[test]
    fn prop_rddm_buffer_bounded(seed in any::<u64>(), capacity in 10usize..200) {
        let params = RddmParameters {
            min_instance: 20,
            max_size_concept: 400,
            min_size_stable_concept: capacity,
            warn_limit: 50,
            ..Default::default()
        };
        let mut rddm = RddmDetector::new(params).unwrap();
        let stream = bernoulli_stream(seed, 0.7, 2000);
        for &ok in &stream {
            rddm.run(ok);
            prop_assert!(rddm.buffered() <= capacity);
        }
    }

    // Property: resetting restores the behaviour of a fresh detector
    #[test]
    fn prop_reset_matches_fresh(seed in any::<u64>(), prefix in 0usize..500) {
        let stream = bernoulli_stream(seed, 0.6, prefix + 500);
        let (head, tail) = stream.split_at(prefix);

        let mut used = EddmDetector::default();
        signals(&mut used, head);
        used.reset();
        prop_assert_eq!(signals(&mut used, tail), signals(&mut EddmDetector::default(), tail));

        let mut used = EwmaDetector::default();
        signals(&mut used, head);
        used.reset();
        prop_assert_eq!(signals(&mut used, tail), signals(&mut EwmaDetector::default(), tail));

        let mut used = CusumDetector::default();
        signals(&mut used, head);
        used.reset();
        prop_assert_eq!(signals(&mut used, tail), signals(&mut CusumDetector::default(), tail));
    }

    // Property: the CUSUM statistic never goes negative
    #[test]
    fn prop_cusum_non_negative(seed in any::<u64>(), accuracy in 0.0..1.0f64) {
        let mut cusum = CusumDetector::default();
        for ok in bernoulli_stream(seed, accuracy, 800) {
            cusum.run(ok);
            prop_assert!(cusum.statistic() >= 0.0);
        }
    }
}

#[test]
fn test_ewma_control_limit_decreases_near_zero() {
    assert!(ewma::control_limit(0.0) > ewma::control_limit(0.1));
    assert!((ewma::control_limit(0.0) - 3.97).abs() < 1e-12);
}
