//! Error Types for the Detection Engine
//!
//! ## Design Philosophy
//!
//! The engine is a pure, deterministic function of its inputs and
//! configuration. Failures are therefore never transient and nothing is
//! retried: an error always means the caller has to fix something upstream.
//!
//! 1. **Small Size**: Variants carry only indices, counts and `&'static str`
//!    reasons, so errors stay `Copy` and cheap to return.
//!
//! 2. **Actionable Information**: Each variant names the invariant that was
//!    violated (which channel, which index, which configuration field).
//!
//! ## Error Categories
//!
//! ### Input Shape
//! - `EmptySignal`: no samples at all
//! - `InsufficientData`: fewer samples than a sampling interval needs
//! - `LengthMismatch`: a channel is not aligned with the timestamps
//! - `NonMonotonicTimestamps`: duplicate instants survive sorting
//! - `InvalidSamplingInterval`: median spacing is zero or not finite
//!
//! ### Configuration
//! - `InvalidConfig`: a field is out of its domain
//! - `ConfigParse`: the JSON configuration document is malformed
//! - `WindowTooShort`: a minute-based window maps to zero samples
//!
//! ### Corrections
//! - `CorrectionParse`: a `BADDATA` line has unparseable date/time fields
//! - `Io`: the correction listing could not be read
//!
//! ## What Is *Not* an Error
//!
//! Cross-day inconsistencies are policy mismatches. They are logged with
//! `log::warn!` and processing continues. Days without any purge candidate
//! simply produce an empty purge set.
//!
//! ```rust
//! use purgeguard_core::{DaySignals, QcError};
//! use chrono::NaiveDate;
//!
//! let t0 = NaiveDate::from_ymd_opt(2020, 5, 12).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let err = DaySignals::new(vec![t0], vec![280.0], vec![60.0]).unwrap_err();
//! assert!(matches!(err, QcError::InsufficientData { required: 2, available: 1 }));
//! ```

use thiserror_no_std::Error;

/// Result type for engine operations
pub type QcResult<T> = Result<T, QcError>;

/// Engine errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum QcError {
    /// The signal holds no samples
    #[error("Signal is empty")]
    EmptySignal,

    /// Not enough samples to derive a sampling interval
    #[error("Insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Minimum number of samples needed
        required: usize,
        /// Actual number of samples available
        available: usize,
    },

    /// A channel does not line up with the timestamps
    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Channel name ("temperature", "humidity", "temperature_flags")
        channel: &'static str,
        /// Number of timestamps
        expected: usize,
        /// Number of values supplied for the channel
        actual: usize,
    },

    /// Timestamps are not strictly increasing after sorting
    #[error("Timestamps not strictly increasing at index {index}")]
    NonMonotonicTimestamps {
        /// First index whose timestamp does not exceed its predecessor
        index: usize,
    },

    /// Median sample spacing is not a positive finite number of seconds
    #[error("Sampling interval is not positive")]
    InvalidSamplingInterval,

    /// A configuration field is out of its domain
    #[error("Invalid configuration field {field}: {reason}")]
    InvalidConfig {
        /// Offending field name
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Configuration document could not be parsed
    #[error("Configuration parse error at line {line}, column {column}")]
    ConfigParse {
        /// 1-based line of the error
        line: usize,
        /// 1-based column of the error
        column: usize,
    },

    /// A minute-based window is shorter than one sample at this sampling rate
    #[error("Window {field} covers {samples} samples at this sampling interval")]
    WindowTooShort {
        /// Configuration field the window comes from
        field: &'static str,
        /// Resulting sample count
        samples: usize,
    },

    /// Correction listing line could not be parsed
    #[error("Correction line {line}: {reason}")]
    CorrectionParse {
        /// 1-based line number
        line: usize,
        /// What could not be parsed
        reason: &'static str,
    },

    /// Reading a correction listing failed
    #[error("I/O error: {kind:?}")]
    Io {
        /// Kind of the underlying I/O error
        kind: std::io::ErrorKind,
    },
}

impl From<std::io::Error> for QcError {
    fn from(err: std::io::Error) -> Self {
        QcError::Io { kind: err.kind() }
    }
}

impl From<serde_json::Error> for QcError {
    fn from(err: serde_json::Error) -> Self {
        QcError::ConfigParse {
            line: err.line(),
            column: err.column(),
        }
    }
}

impl QcError {
    /// Whether the error stems from malformed input arrays
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            QcError::EmptySignal
                | QcError::InsufficientData { .. }
                | QcError::LengthMismatch { .. }
                | QcError::NonMonotonicTimestamps { .. }
                | QcError::InvalidSamplingInterval
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_violation() {
        let err = QcError::LengthMismatch {
            channel: "humidity",
            expected: 10,
            actual: 9,
        };
        assert_eq!(err.to_string(), "Channel humidity has 9 samples, expected 10");
    }

    #[test]
    fn input_shape_classification() {
        assert!(QcError::EmptySignal.is_input_shape());
        assert!(QcError::NonMonotonicTimestamps { index: 3 }.is_input_shape());
        assert!(!QcError::InvalidConfig { field: "window_minutes", reason: "must be positive" }
            .is_input_shape());
    }

    #[test]
    fn json_errors_keep_position() {
        let err: QcError = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }")
            .unwrap_err()
            .into();
        assert!(matches!(err, QcError::ConfigParse { line: 2, .. }));
    }
}
