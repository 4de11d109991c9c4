//! SeqDrift2 sequential drift detection
//!
//! [`SeqDrift2`] works on real values in `[0, 1]`; [`SeqDrift2Detector`]
//! adapts it to the boolean detector contract. Reservoir sampling draws from
//! a [`rand_chacha::ChaCha8Rng`] seeded from the parameters, so runs are
//! reproducible and `reset` replays the same random choices.
//!
//! ## Usage
//!
//! ```rust
//! use drift_seq::SeqDrift2;
//!
//! let mut seq = SeqDrift2::new(0.01, 200, 0).unwrap();
//! for _ in 0..400 {
//!     assert!(!seq.set_input(0.1));
//! }
//! let drift = (0..200).map(|_| seq.set_input(0.9)).any(|d| d);
//! assert!(drift);
//! ```

pub mod reservoir;
pub mod seq_drift2;

pub use reservoir::{BlockRepository, Reservoir};
pub use seq_drift2::{SeqDrift2, SeqDrift2Detector, SeqDrift2Parameters};
