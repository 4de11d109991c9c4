//! # Robust Drift
//!
//! Streaming concept-drift detectors for evaluating online classifiers.
//!
//! Every detector consumes one boolean per classified record ("was the
//! prediction correct") and answers with a [`Signal`]. The detectors live in
//! separate crates by the statistical tool they are built on:
//!
//! - [`drift_core`]: the [`DriftDetector`] contract, bounds, runtime accounting
//! - [`drift_control`]: DDM, EDDM, RDDM, CUSUM, EWMA
//! - [`drift_hoeffding`]: FHDDM, FHDDMS, FHDDMS.add, HDDM.A, HDDM.W
//! - [`drift_mcdiarmid`]: MDDM.A, MDDM.G, MDDM.E
//! - [`drift_adwin`]: ADWIN
//! - [`drift_seq`]: SeqDrift2
//!
//! This crate adds the closed [`Detector`] enum and the serializable
//! [`DetectorConfig`] that builds it.
//!
//! ## Quick Start
//!
//! ```rust
//! use robust_drift::{DetectorConfig, DriftDetector, TimedDetector};
//!
//! let config: DetectorConfig = serde_json::from_str(r#"{"algorithm": "FHDDM", "n": 50}"#).unwrap();
//! let mut detector = TimedDetector::new(config.build().unwrap());
//! assert_eq!(detector.file_stem(), "FHDDM.50.1E-06");
//!
//! let mut drifts = 0;
//! for i in 0..1000 {
//!     let is_correct = if i < 500 { i % 10 != 0 } else { i % 2 == 0 };
//!     if detector.detect(is_correct).drift {
//!         drifts += 1;
//!         detector.reset();
//!     }
//! }
//! assert!(drifts >= 1);
//! ```

pub mod config;
pub mod detector;
pub mod no_detection;

pub use config::DetectorConfig;
pub use detector::Detector;
pub use no_detection::NoDetection;

// Re-export the member crates
pub use drift_adwin;
pub use drift_control;
pub use drift_core;
pub use drift_hoeffding;
pub use drift_mcdiarmid;
pub use drift_seq;

pub use drift_adwin::{Adwin, AdwinDetector, AdwinParameters};
pub use drift_control::{
    CusumDetector, CusumParameters, DdmDetector, DdmParameters, EddmDetector, EddmParameters, EwmaDetector,
    EwmaParameters, RddmDetector, RddmParameters,
};
pub use drift_core::{
    run_sequence, DetectorSettings, DriftDetector, Error, Result, RuntimeCounters, Signal, TimedDetector,
};
pub use drift_hoeffding::{
    FhddmDetector, FhddmParameters, FhddmsAddDetector, FhddmsDetector, FhddmsParameters, HddmADetector,
    HddmAParameters, HddmWDetector, HddmWParameters, TestType,
};
pub use drift_mcdiarmid::{MddmAParameters, MddmDetector, MddmEParameters, MddmGParameters, WeightScheme};
pub use drift_seq::{SeqDrift2, SeqDrift2Detector, SeqDrift2Parameters};
