//! Time-Related Constants
//!
//! Conversion factors used when turning minute/hour based configuration into
//! sample counts.

// ===== TIME UNIT CONVERSIONS =====

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Hour of the day that splits morning from afternoon purges.
pub const NOON_HOUR: u32 = 12;

/// Nanoseconds per second.
pub const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
