//! Purge-cycle and dip detection for HMP155 temperature/humidity records
//!
//! The heated HMP155 probe periodically purges: both readings are held at a
//! fixed value for several minutes, and humidity may dip and recover right
//! after. This crate finds those stretches from the signal alone and writes
//! per-sample QC flags for both channels.
//!
//! Key properties:
//! - Pure batch pass over one day; no state between calls
//! - Every threshold is a named, defaulted configuration field
//! - Half-open intervals everywhere
//!
//! ```no_run
//! use purgeguard_core::{DayInputs, DaySignals, FlagValue, PurgeEngine};
//! # fn load() -> (Vec<chrono::NaiveDateTime>, Vec<f64>, Vec<f64>) { unimplemented!() }
//!
//! let (timestamps, temperature, humidity) = load();
//! let signals = DaySignals::new(timestamps, temperature, humidity)?;
//! let engine = PurgeEngine::with_defaults()?;
//!
//! let report = engine.process(&signals, &DayInputs::default())?;
//! println!("{} purge samples", report.temperature_flags().count(FlagValue::Purge));
//! # Ok::<(), purgeguard_core::QcError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compositor;
pub mod config;
pub mod constants;
pub mod corrections;
pub mod cross_day;
pub mod detectors;
pub mod engine;
pub mod errors;
pub mod flags;
pub mod intervals;
pub mod policy;
pub mod signal;
pub mod time;
pub mod traits;

// Public API
pub use compositor::{ChannelFlags, FlagCompositor};
pub use config::{CandidateShaping, DipConfig, InconsistentReference, PurgeConfig};
pub use cross_day::{CrossDayValidator, ExpectedWindow};
pub use detectors::{Dip, DipDetector, FlatRegionDetector, SaturationFilter};
pub use engine::{DayInputs, DayReport, PurgeEngine, Reference};
pub use errors::{QcError, QcResult};
pub use flags::{FlagArray, FlagValue};
pub use intervals::{IndexInterval, IntervalCodec, TimeInterval};
pub use policy::{IntervalPolicy, PurgeCandidate};
pub use signal::DaySignals;
pub use time::{SamplingInterval, Timestamp};
pub use traits::{Mask, MaskDetector};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
