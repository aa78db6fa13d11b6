//! Detection Defaults for HMP155 Purge Cycles
//!
//! The HMP155 periodically heats its probe ("chemical purge"). While it does,
//! the reported temperature and humidity are frozen at the value from the
//! start of the purge, and humidity takes a few minutes to recover afterwards.
//! The values below were tuned on one-minute-or-faster records and are the
//! engine's default configuration.

// ===== FLAT REGION DETECTION =====

/// Rolling window for the flatness statistic (minutes).
///
/// Long enough that natural quiet periods rarely hold below threshold for a
/// whole window, short enough to resolve a single purge.
pub const DEFAULT_WINDOW_MINUTES: f64 = 8.0;

/// Rolling standard deviation below which temperature counts as flat (K).
pub const DEFAULT_TEMPERATURE_STD_THRESHOLD: f64 = 0.07;

/// Rolling standard deviation below which humidity counts as flat (%RH).
///
/// Stricter than the temperature threshold: held humidity is exactly constant.
pub const DEFAULT_HUMIDITY_STD_THRESHOLD: f64 = 0.05;

/// Humidity at or above which a plateau is saturation, not a purge (%RH).
pub const DEFAULT_SATURATION_CEILING_PCT: f64 = 99.5;

/// Looser ceiling used when re-deriving a reference day's purges (%RH).
pub const DEFAULT_REFERENCE_SATURATION_CEILING_PCT: f64 = 99.9;

// ===== PURGE INTERVAL POLICY =====

/// Minimum purge duration; candidates are padded by half of it (minutes).
pub const DEFAULT_MIN_PURGE_MINUTES: f64 = 8.0;

/// Humidity recovery window flagged after each purge (minutes).
pub const DEFAULT_RECOVERY_MINUTES: f64 = 6.0;

/// Candidates kept per day before the cutover date (twice-daily purges).
pub const DEFAULT_KEEP_BEFORE_CUTOVER: usize = 2;

/// Candidates kept per day from the cutover date on (once-daily purges).
pub const DEFAULT_KEEP_AFTER_CUTOVER: usize = 1;

/// Date the instrument switched from two purges a day to one (YYYY, MM, DD).
pub const DEFAULT_CUTOVER_YMD: (i32, u32, u32) = (2018, 3, 13);

/// Spacing between the two daily purges before the cutover (hours).
pub const DEFAULT_FALLBACK_OFFSET_HOURS: f64 = 12.0;

// ===== HUMIDITY DIP DETECTION =====

/// Minimum drop below the recent maximum for a dip (%RH).
pub const DEFAULT_DIP_DROP_THRESHOLD: f64 = 3.0;

/// Maximum time from dip start to recovery (seconds).
pub const DEFAULT_DIP_RECOVERY_SECONDS: f64 = 360.0;

/// Samples scanned after a dip start when looking for recovery.
pub const DEFAULT_DIP_SEARCH_WIDTH: usize = 20;

/// Trailing samples that must contain a flat point before a dip.
pub const DEFAULT_DIP_FLAT_WINDOW: usize = 5;

/// Looser flatness threshold for the pre-dip check (%RH).
pub const DEFAULT_DIP_FLAT_THRESHOLD: f64 = 0.1;

/// Samples before a candidate start used for the pre-dip maximum.
pub const DEFAULT_DIP_LOOKBACK: usize = 3;

/// Samples at the end of the day never evaluated as dip starts.
pub const DEFAULT_DIP_TAIL_MARGIN: usize = 10;

/// Window before an accepted dip optionally flagged as purge (minutes).
pub const DEFAULT_DIP_BUFFER_MINUTES: f64 = 8.0;

// ===== CROSS-DAY VALIDATION =====

/// Allowed drift of purge time of day between consecutive days (seconds).
pub const DEFAULT_CONSISTENCY_TOLERANCE_SECONDS: f64 = 3600.0;

/// Padding around expected purge windows when gating dips (seconds).
pub const DEFAULT_WINDOW_PADDING_SECONDS: f64 = 900.0;

// ===== AUXILIARY PASSES =====

/// Historical low-temperature cut used by the optional BAD pass (K).
///
/// Below this the HMP155 is outside its specified range. Disabled unless
/// `PurgeConfig::low_temperature_threshold` is set.
pub const HISTORICAL_LOW_TEMPERATURE_K: f64 = 245.0;
