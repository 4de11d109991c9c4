//! Property-based tests for the MDDM family

use drift_core::DriftDetector;
use drift_mcdiarmid::*;
use proptest::prelude::*;

fn scheme_strategy() -> impl Strategy<Value = WeightScheme> {
    prop_oneof![
        (0.0..0.5f64).prop_map(|difference| WeightScheme::Arithmetic { difference }),
        (1.0..1.2f64).prop_map(|ratio| WeightScheme::Geometric { ratio }),
        (0.0..0.2f64).prop_map(|lambda| WeightScheme::Euler { lambda }),
    ]
}

proptest! {
    // Property: weights are a probability vector for every scheme
    #[test]
    fn prop_weights_normalised(scheme in scheme_strategy(), n in 1usize..500) {
        let weights = scheme.normalized_weights(n).unwrap();
        prop_assert_eq!(weights.len(), n);
        let sum: f64 = weights.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        prop_assert!(weights.iter().all(|w| *w > 0.0));
    }

    // Property: the window never exceeds n and a perfect stream never drifts
    #[test]
    fn prop_window_bounded(
        scheme in scheme_strategy(),
        n in 1usize..80,
        stream in prop::collection::vec(any::<bool>(), 0..300)
    ) {
        let mut mddm = MddmDetector::new(MddmParameters { n, scheme, delta: 1e-6 }).unwrap();
        for &ok in &stream {
            let signal = mddm.run(ok);
            prop_assert!(mddm.window_len() <= n);
            prop_assert!(!signal.warning);
        }

        mddm.reset();
        for _ in 0..2 * n {
            prop_assert!(!mddm.run(true).drift);
        }
    }
}
