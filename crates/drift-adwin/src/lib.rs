//! ADWIN adaptive windowing
//!
//! [`Adwin`] works on real values and reports whether its window shrank;
//! [`AdwinDetector`] adapts it to the boolean detector contract by feeding
//! `1.0` for a correct prediction and `0.0` otherwise.
//!
//! ## Usage
//!
//! ```rust
//! use drift_adwin::Adwin;
//!
//! let mut adwin = Adwin::new(0.002).unwrap();
//! for _ in 0..1000 {
//!     adwin.set_input(0.2);
//! }
//! assert_eq!(adwin.width(), 1000);
//! let shrunk = (0..500).any(|_| adwin.set_input(0.9));
//! assert!(shrunk);
//! assert!(adwin.width() < 1500);
//! ```

pub mod adwin;
pub mod histogram;

pub use adwin::{Adwin, AdwinDetector, AdwinParameters};
pub use histogram::{Bucket, BucketRow, ExponentialHistogram, MAX_BUCKETS};
