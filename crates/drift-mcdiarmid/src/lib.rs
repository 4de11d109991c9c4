//! McDiarmid drift detectors
//!
//! MDDM generalises FHDDM by weighting the observations of its sliding window.
//! The three variants only differ in how weights progress from the oldest to
//! the newest position:
//!
//! - **MDDM.A**: arithmetic, `1 + i * d`
//! - **MDDM.G**: geometric, `r^i`
//! - **MDDM.E**: Euler, `e^(lambda * i)`
//!
//! ## Usage
//!
//! ```rust
//! use drift_core::DriftDetector;
//! use drift_mcdiarmid::{MddmDetector, MddmAParameters};
//!
//! let mut mddm = MddmDetector::new(MddmAParameters::default()).unwrap();
//! assert_eq!(mddm.display_name(), "MDDM.A.100");
//! let stream = (0..400).map(|i| i < 200 || i % 4 == 0);
//! assert!(stream.map(|ok| mddm.run(ok)).any(|s| s.drift));
//! ```

pub mod mddm;
pub mod weights;

pub use mddm::{MddmAParameters, MddmDetector, MddmEParameters, MddmGParameters, MddmParameters};
pub use weights::WeightScheme;
