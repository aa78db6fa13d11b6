//! Constants for PurgeGuard Core
//!
//! Every numeric default the engine uses is defined here, once, with a note
//! on where it comes from. `PurgeConfig::default()` is built from these values
//! so that changing a default is a one-line edit.
//!
//! ## Organization
//!
//! - **Defaults**: detection thresholds, window lengths and policy values
//!   observed for the HMP155 purge cycle
//! - **Time**: unit conversion factors

/// Detection and policy defaults for HMP155-class purge cycles.
pub mod defaults;

/// Time unit conversions.
pub mod time;

pub use defaults::{
    DEFAULT_WINDOW_MINUTES, DEFAULT_TEMPERATURE_STD_THRESHOLD, DEFAULT_HUMIDITY_STD_THRESHOLD,
    DEFAULT_MIN_PURGE_MINUTES, DEFAULT_RECOVERY_MINUTES, DEFAULT_SATURATION_CEILING_PCT,
};

pub use time::{SECONDS_PER_MINUTE, SECONDS_PER_HOUR};
