//! Core traits and types for streaming concept-drift detection
//!
//! This crate defines the contract every detector in the workspace
//! implements, plus the small pieces they share:
//!
//! - [`DriftDetector`]: one boolean observation in, one [`Signal`] out
//! - [`TimedDetector`]: runtime accounting with per-episode and total counters
//! - [`bounds`]: Hoeffding and McDiarmid bounds with guarded arithmetic
//! - [`BoolWindow`]: fixed-capacity circular buffer of observations
//!
//! ## Usage
//!
//! ```rust
//! use drift_core::{DetectorSettings, DriftDetector, Signal, TimedDetector};
//!
//! struct Never;
//!
//! impl DriftDetector for Never {
//!     fn algorithm_name(&self) -> &'static str { "NEVER" }
//!     fn run(&mut self, _is_correct: bool) -> Signal { Signal::NONE }
//!     fn reset(&mut self) {}
//!     fn settings(&self) -> DetectorSettings { DetectorSettings::new("", "never") }
//! }
//!
//! let mut detector = TimedDetector::new(Never);
//! assert_eq!(detector.detect(true), Signal::NONE);
//! ```

pub mod bounds;
pub mod error;
pub mod timing;
pub mod traits;
pub mod types;
pub mod window;

pub use bounds::{hoeffding_bound, mcdiarmid_bound};
pub use error::{check_positive, check_probability, check_size, Error, Result};
pub use timing::{RuntimeCounters, TimedDetector};
pub use traits::{run_sequence, DriftDetector};
pub use types::{format_value, DetectorSettings, Signal};
pub use window::BoolWindow;
