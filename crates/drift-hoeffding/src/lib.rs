//! Hoeffding-bound drift detectors
//!
//! - **FHDDM**: sliding window accuracy against its running maximum
//! - **FHDDMS**: stacked short and long windows over one buffer
//! - **FHDDMS.add**: FHDDMS keeping only a count per sub-window
//! - **HDDM.A.test**: cumulative averages with moving cut points
//! - **HDDM.W.test**: EWMA estimators with McDiarmid-style bounds
//!
//! Thresholds that depend only on the configuration are computed once at
//! construction, so an invalid `delta` is rejected up front and `run` never
//! fails.
//!
//! ## Usage
//!
//! ```rust
//! use drift_core::DriftDetector;
//! use drift_hoeffding::{FhddmDetector, FhddmParameters};
//!
//! let mut fhddm = FhddmDetector::new(FhddmParameters::default()).unwrap();
//! let stream = (0..400).map(|i| i < 200 || i % 4 == 0);
//! assert!(stream.map(|ok| fhddm.run(ok)).any(|s| s.drift));
//! ```

pub mod fhddm;
pub mod fhddms;
pub mod fhddms_add;
pub mod hddm_a;
pub mod hddm_w;

pub use fhddm::{FhddmDetector, FhddmParameters};
pub use fhddms::{FhddmsDetector, FhddmsParameters};
pub use fhddms_add::FhddmsAddDetector;
pub use hddm_a::{HddmADetector, HddmAParameters, TestType};
pub use hddm_w::{HddmWDetector, HddmWParameters};
