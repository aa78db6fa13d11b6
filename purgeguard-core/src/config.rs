//! Engine configuration
//!
//! Every threshold and window the detectors use is a named field here, with
//! the tuned HMP155 values as defaults. The configuration is plain data: it
//! can be built in code, deserialized from JSON, and is validated once when
//! the engine is created.
//!
//! Durations are given in minutes or seconds and converted to sample counts
//! per day, because the sampling interval is only known once a record has
//! been read.
//!
//! ```rust
//! use purgeguard_core::PurgeConfig;
//!
//! let config = PurgeConfig::from_json(r#"{
//!     "window_minutes": 10.0,
//!     "dip": { "drop_threshold": 4.0 }
//! }"#)?;
//! assert_eq!(config.window_minutes, 10.0);
//! assert_eq!(config.dip.drop_threshold, 4.0);
//! // untouched fields keep their defaults
//! assert_eq!(config.recovery_minutes, 6.0);
//! # Ok::<(), purgeguard_core::QcError>(())
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::defaults::*,
    errors::{QcError, QcResult},
    time::SamplingInterval,
};

/// How the combined purge mask is turned into candidate intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateShaping {
    /// Pad every flat run by half the minimum purge duration on both sides
    HalfPadding,
    /// Drop runs shorter than the minimum, widen the rest by the full minimum
    FilterAndExpand,
}

/// What to do with expected windows after a failed consistency check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InconsistentReference {
    /// Keep gating dips with the reference windows
    KeepWindows,
    /// Fall back to accepting every dip
    AcceptAll,
}

/// Humidity dip detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DipConfig {
    /// Minimum drop below the recent maximum (%RH)
    pub drop_threshold: f64,
    /// Maximum time from dip start to recovery (seconds)
    pub recovery_seconds: f64,
    /// Samples scanned for recovery after a dip start
    pub search_width: usize,
    /// Trailing samples that must contain a quiet point; also the quiet window
    pub flat_window: usize,
    /// Standard deviation threshold for the quiet test (%RH)
    pub flat_threshold: f64,
    /// Samples before the start used for the pre-dip maximum
    pub lookback: usize,
    /// Samples at the end of the record never evaluated
    pub tail_margin: usize,
}

impl Default for DipConfig {
    fn default() -> Self {
        Self {
            drop_threshold: DEFAULT_DIP_DROP_THRESHOLD,
            recovery_seconds: DEFAULT_DIP_RECOVERY_SECONDS,
            search_width: DEFAULT_DIP_SEARCH_WIDTH,
            flat_window: DEFAULT_DIP_FLAT_WINDOW,
            flat_threshold: DEFAULT_DIP_FLAT_THRESHOLD,
            lookback: DEFAULT_DIP_LOOKBACK,
            tail_margin: DEFAULT_DIP_TAIL_MARGIN,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurgeConfig {
    /// Rolling window for the flatness statistic (minutes)
    pub window_minutes: f64,
    /// Temperature flatness threshold (K)
    pub temperature_std_threshold: f64,
    /// Humidity flatness threshold (%RH)
    pub humidity_std_threshold: f64,
    /// Minimum purge duration (minutes)
    pub min_purge_minutes: f64,
    /// Humidity recovery window after each purge (minutes)
    pub recovery_minutes: f64,
    /// Humidity at or above which flat spans are saturation (%RH)
    pub saturation_ceiling: f64,
    /// Saturation ceiling when re-deriving a reference day from raw signals (%RH)
    pub reference_saturation_ceiling: f64,
    /// Dip detection settings
    pub dip: DipConfig,
    /// Allowed purge time-of-day drift between days (seconds)
    pub consistency_tolerance_seconds: f64,
    /// Padding around expected windows when gating dips (seconds)
    pub window_padding_seconds: f64,
    /// First date with a single daily purge
    pub cutover_date: NaiveDate,
    /// Purges kept per day before the cutover
    pub keep_before_cutover: usize,
    /// Purges kept per day from the cutover on
    pub keep_after_cutover: usize,
    /// Spacing of the synthesized twin purge (hours)
    pub fallback_offset_hours: f64,
    /// Flag the stretch before each accepted dip as purge
    pub flag_before_dip_as_purge: bool,
    /// Length of that stretch (minutes)
    pub dip_buffer_minutes: f64,
    /// Candidate interval shaping
    pub candidate_shaping: CandidateShaping,
    /// Gating policy after an inconsistent reference
    pub inconsistent_reference: InconsistentReference,
    /// Optional low-temperature BAD pass threshold (K)
    pub low_temperature_threshold: Option<f64>,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_CUTOVER_YMD;
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            temperature_std_threshold: DEFAULT_TEMPERATURE_STD_THRESHOLD,
            humidity_std_threshold: DEFAULT_HUMIDITY_STD_THRESHOLD,
            min_purge_minutes: DEFAULT_MIN_PURGE_MINUTES,
            recovery_minutes: DEFAULT_RECOVERY_MINUTES,
            saturation_ceiling: DEFAULT_SATURATION_CEILING_PCT,
            reference_saturation_ceiling: DEFAULT_REFERENCE_SATURATION_CEILING_PCT,
            dip: DipConfig::default(),
            consistency_tolerance_seconds: DEFAULT_CONSISTENCY_TOLERANCE_SECONDS,
            window_padding_seconds: DEFAULT_WINDOW_PADDING_SECONDS,
            cutover_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
            keep_before_cutover: DEFAULT_KEEP_BEFORE_CUTOVER,
            keep_after_cutover: DEFAULT_KEEP_AFTER_CUTOVER,
            fallback_offset_hours: DEFAULT_FALLBACK_OFFSET_HOURS,
            flag_before_dip_as_purge: false,
            dip_buffer_minutes: DEFAULT_DIP_BUFFER_MINUTES,
            candidate_shaping: CandidateShaping::HalfPadding,
            inconsistent_reference: InconsistentReference::KeepWindows,
            low_temperature_threshold: None,
        }
    }
}

/// Minute-based settings resolved to sample counts for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindows {
    /// Flatness window
    pub flat: usize,
    /// Minimum purge duration
    pub min_purge: usize,
    /// Post-purge humidity recovery
    pub recovery: usize,
    /// Twin purge offset
    pub fallback_offset: usize,
    /// Stretch before a dip optionally flagged as purge
    pub dip_buffer: usize,
}

impl PurgeConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> QcResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against its domain
    pub fn validate(&self) -> QcResult<()> {
        positive("window_minutes", self.window_minutes)?;
        non_negative("temperature_std_threshold", self.temperature_std_threshold)?;
        non_negative("humidity_std_threshold", self.humidity_std_threshold)?;
        non_negative("min_purge_minutes", self.min_purge_minutes)?;
        non_negative("recovery_minutes", self.recovery_minutes)?;
        finite("saturation_ceiling", self.saturation_ceiling)?;
        finite("reference_saturation_ceiling", self.reference_saturation_ceiling)?;
        non_negative("consistency_tolerance_seconds", self.consistency_tolerance_seconds)?;
        non_negative("window_padding_seconds", self.window_padding_seconds)?;
        positive("fallback_offset_hours", self.fallback_offset_hours)?;
        non_negative("dip_buffer_minutes", self.dip_buffer_minutes)?;

        if self.keep_before_cutover == 0 {
            return Err(invalid("keep_before_cutover", "must keep at least one purge"));
        }
        if self.keep_after_cutover == 0 {
            return Err(invalid("keep_after_cutover", "must keep at least one purge"));
        }
        if let Some(threshold) = self.low_temperature_threshold {
            finite("low_temperature_threshold", threshold)?;
        }

        non_negative("dip.drop_threshold", self.dip.drop_threshold)?;
        non_negative("dip.recovery_seconds", self.dip.recovery_seconds)?;
        non_negative("dip.flat_threshold", self.dip.flat_threshold)?;
        if self.dip.search_width < 2 {
            return Err(invalid("dip.search_width", "must scan at least one sample ahead"));
        }
        if self.dip.flat_window == 0 {
            return Err(invalid("dip.flat_window", "must cover at least one sample"));
        }
        if self.dip.lookback == 0 {
            return Err(invalid("dip.lookback", "must look at least one sample back"));
        }

        Ok(())
    }

    /// Resolve minute-based windows against a record's sampling interval
    pub fn sample_windows(&self, sampling: SamplingInterval) -> QcResult<SampleWindows> {
        let flat = sampling.samples_in_minutes(self.window_minutes);
        if flat == 0 {
            return Err(QcError::WindowTooShort {
                field: "window_minutes",
                samples: flat,
            });
        }
        let fallback_offset = sampling.samples_in_hours(self.fallback_offset_hours);
        if fallback_offset == 0 {
            return Err(QcError::WindowTooShort {
                field: "fallback_offset_hours",
                samples: fallback_offset,
            });
        }

        Ok(SampleWindows {
            flat,
            min_purge: sampling.samples_in_minutes(self.min_purge_minutes),
            recovery: sampling.samples_in_minutes(self.recovery_minutes),
            fallback_offset,
            dip_buffer: sampling.samples_in_minutes(self.dip_buffer_minutes),
        })
    }
}

fn invalid(field: &'static str, reason: &'static str) -> QcError {
    QcError::InvalidConfig { field, reason }
}

fn finite(field: &'static str, value: f64) -> QcResult<()> {
    if !value.is_finite() {
        return Err(invalid(field, "must be finite"));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> QcResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> QcResult<()> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PurgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cutover_date, NaiveDate::from_ymd_opt(2018, 3, 13).unwrap());
        assert!(!config.flag_before_dip_as_purge);
    }

    #[test]
    fn windows_at_one_minute_sampling() {
        let sampling = SamplingInterval::from_seconds(60.0).unwrap();
        let windows = PurgeConfig::default().sample_windows(sampling).unwrap();
        assert_eq!(
            windows,
            SampleWindows {
                flat: 8,
                min_purge: 8,
                recovery: 6,
                fallback_offset: 720,
                dip_buffer: 8,
            }
        );
    }

    #[test]
    fn coarse_sampling_cannot_resolve_window() {
        let sampling = SamplingInterval::from_seconds(600.0).unwrap();
        assert_eq!(
            PurgeConfig::default().sample_windows(sampling),
            Err(QcError::WindowTooShort { field: "window_minutes", samples: 0 })
        );
    }

    #[test]
    fn json_round_trip_and_enums() {
        let mut config = PurgeConfig::default();
        config.candidate_shaping = CandidateShaping::FilterAndExpand;
        config.low_temperature_threshold = Some(245.0);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"filter_and_expand\""));
        assert!(json.contains("\"2018-03-13\""));
        assert_eq!(PurgeConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        let err = PurgeConfig::from_json(r#"{ "window_minutes": -1.0 }"#).unwrap_err();
        assert_eq!(
            err,
            QcError::InvalidConfig { field: "window_minutes", reason: "must be positive" }
        );
        assert!(matches!(
            PurgeConfig::from_json(r#"{ "keep_after_cutover": 0 }"#),
            Err(QcError::InvalidConfig { field: "keep_after_cutover", .. })
        ));
        assert!(matches!(
            PurgeConfig::from_json(r#"{ "no_such_field": 1 }"#),
            Err(QcError::ConfigParse { .. })
        ));
    }
}
