//! Control-chart drift detectors
//!
//! All detectors in this crate estimate the classifier's error rate (or, for
//! EDDM, the distance between errors) online and compare it against limits
//! derived from the history of the stream:
//!
//! - **DDM**: minimum of `p + s`, warning/drift at 2 and 3 standard deviations
//! - **EDDM**: mean + 2 stdev of the inter-error distance against its maximum
//! - **RDDM**: DDM with a replay buffer that rebuilds statistics after a drift
//! - **CUSUM**: Page's one-sided cumulative sum
//! - **EWMA**: EWMA chart with a dynamic control limit
//!
//! Every detector takes `is_correct` and internally converts it into an error
//! indicator (`1` for a misclassification).
//!
//! ## Usage
//!
//! ```rust
//! use drift_control::{DdmDetector, DdmParameters};
//! use drift_core::DriftDetector;
//!
//! let mut ddm = DdmDetector::new(DdmParameters { min_instance: 30 }).unwrap();
//! let stream = (0..200).map(|i| i < 100 || i % 2 == 0);
//! let drifts = stream.filter(|&ok| ddm.run(ok).drift).count();
//! assert!(drifts > 0);
//! ```

pub mod cusum;
pub mod ddm;
pub mod eddm;
pub mod ewma;
pub mod rddm;

pub use cusum::{CusumDetector, CusumParameters};
pub use ddm::{DdmDetector, DdmParameters};
pub use eddm::{EddmDetector, EddmParameters};
pub use ewma::{EwmaDetector, EwmaParameters};
pub use rddm::{RddmDetector, RddmParameters};

/// Sentinel for a minimum that has not been recorded yet
pub(crate) const UNSET: f64 = f64::MAX;
