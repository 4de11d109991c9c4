//! Types shared by every drift detector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of feeding one observation to a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Signal {
    /// The monitored statistic has entered the warning zone
    pub warning: bool,
    /// A concept drift was detected
    pub drift: bool,
}

impl Signal {
    /// Neither warning nor drift
    pub const NONE: Signal = Signal {
        warning: false,
        drift: false,
    };

    /// Warning only
    pub const WARNING: Signal = Signal {
        warning: true,
        drift: false,
    };

    /// Drift only
    pub const DRIFT: Signal = Signal {
        warning: false,
        drift: true,
    };

    /// Create a signal from its two flags
    pub fn new(warning: bool, drift: bool) -> Self {
        Self { warning, drift }
    }

    /// Drift-only signal, raised when `drift` is true
    pub fn drift_if(drift: bool) -> Self {
        Self {
            warning: false,
            drift,
        }
    }

    /// `(warning, drift)` pair
    pub fn as_tuple(self) -> (bool, bool) {
        (self.warning, self.drift)
    }
}

impl From<Signal> for (bool, bool) {
    fn from(signal: Signal) -> Self {
        signal.as_tuple()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.warning, self.drift) {
            (_, true) => write!(f, "Drift"),
            (true, false) => write!(f, "Warning"),
            (false, false) => write!(f, "Stable"),
        }
    }
}

/// Configuration description of a detector
///
/// `id` is compact and stable (used to build output file names), `label` is
/// meant for plots and reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// Stable identifier built from the configuration values
    pub id: String,
    /// Human readable label
    pub label: String,
}

impl DetectorSettings {
    /// Create a settings description
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// File stem `"{name}.{id}"`, or just `name` when the id is empty
    pub fn file_stem(&self, name: &str) -> String {
        if self.id.is_empty() {
            name.to_string()
        } else {
            format!("{name}.{}", self.id)
        }
    }
}

impl fmt::Display for DetectorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

/// Format a configuration value the way ids and labels show them
///
/// Integral values print without a fractional part and very small or very
/// large magnitudes switch to upper-case scientific notation, so `1e-6`
/// prints as `1E-06`.
pub fn format_value(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude < 1e-4 || magnitude >= 1e16 {
        let formatted = format!("{value:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}E{sign}{digits:0>2}")
            }
            None => formatted,
        }
    } else {
        value.to_string()
    }
}
