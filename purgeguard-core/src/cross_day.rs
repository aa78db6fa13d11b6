//! Cross-Day Validation
//!
//! ## Why a Reference Day
//!
//! The instrument purges on its own clock, at roughly the same time every
//! day. Yesterday's purges therefore tell us when today's should happen, and
//! a humidity dip far from that time is much more likely to be weather than
//! a purge after-effect.
//!
//! ## Operations
//!
//! - **Consistency**: the reference and current purge lists should have the
//!   same length and start within an hour of each other (time of day). A
//!   mismatch is logged and never fatal.
//! - **Expected windows**: each reference purge as a time-of-day span.
//! - **Gate**: a dip is accepted when its start time of day falls within an
//!   expected window padded on both sides. Without any window every dip is
//!   accepted.
//!
//! ```text
//! reference day     |----[P]-----------------------[P]----|
//! expected windows      [===]                       [===]
//! padded gate         [=======]                   [=======]
//! today's dips          ^ kept        ^ dropped         ^ kept
//! ```

use chrono::Duration;

use crate::{
    config::PurgeConfig,
    detectors::Dip,
    errors::{QcError, QcResult},
    flags::{FlagArray, FlagValue},
    intervals::{extract_runs, IntervalCodec, TimeInterval},
    time::{as_seconds, from_seconds, midnight_of, time_of_day, SamplingInterval, Timestamp},
};

/// Time-of-day span during which a purge is expected
///
/// Both ends are measured from the midnight of the reference interval's
/// start, so `end` may exceed 24 h for a purge running past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpectedWindow {
    /// Offset of the window start from midnight
    pub start: Duration,
    /// Offset of the window end from midnight
    pub end: Duration,
}

impl ExpectedWindow {
    /// Window from offsets since midnight
    pub fn new(start: Duration, end: Duration) -> Self {
        Self { start, end }
    }

    /// Window covering a reference interval
    pub fn from_interval(interval: &TimeInterval) -> Self {
        let midnight = midnight_of(interval.start);
        Self {
            start: interval.start - midnight,
            end: interval.end - midnight,
        }
    }

    /// Whether `tod` lies in `[start - padding, end + padding)`
    ///
    /// `end` is the instant after the last purge sample, so the padding is
    /// counted from that last sample on regular data.
    pub fn admits(&self, tod: Duration, padding: Duration) -> bool {
        self.start - padding <= tod && tod < self.end + padding
    }

    /// Same window moved by `offset`
    pub fn shifted(&self, offset: Duration) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Expected windows from the reference purge intervals
pub fn build_expected_windows(reference: &[TimeInterval]) -> Vec<ExpectedWindow> {
    reference.iter().map(ExpectedWindow::from_interval).collect()
}

/// Start time-of-day differences `b - a` in seconds, paired in start order
///
/// A count mismatch is logged and the shorter list bounds the pairing.
pub fn time_of_day_shifts(a: &[TimeInterval], b: &[TimeInterval]) -> Vec<f64> {
    if a.len() != b.len() {
        log::warn!(
            "purge count mismatch when measuring shifts: {} vs {}",
            a.len(),
            b.len()
        );
    }
    sorted_by_start(a)
        .iter()
        .zip(sorted_by_start(b).iter())
        .map(|(x, y)| as_seconds(time_of_day(y.start) - time_of_day(x.start)))
        .collect()
}

/// Runs of `Purge` in a processed day's temperature flags, as time intervals
pub fn reference_intervals_from_flags(
    timestamps: &[Timestamp],
    temperature_flags: &FlagArray,
    sampling: SamplingInterval,
) -> QcResult<Vec<TimeInterval>> {
    if temperature_flags.len() != timestamps.len() {
        return Err(QcError::LengthMismatch {
            channel: "temperature_flags",
            expected: timestamps.len(),
            actual: temperature_flags.len(),
        });
    }
    let runs = extract_runs(&temperature_flags.mask_of(FlagValue::Purge));
    Ok(IntervalCodec::new(timestamps, sampling).to_times(&runs))
}

fn sorted_by_start(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| iv.start);
    sorted
}

/// Consistency check and dip gating against a reference day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossDayValidator {
    tolerance: Duration,
    padding: Duration,
}

impl CrossDayValidator {
    /// Validator with explicit tolerance and padding in seconds
    pub fn new(tolerance_seconds: f64, padding_seconds: f64) -> Self {
        Self {
            tolerance: from_seconds(tolerance_seconds),
            padding: from_seconds(padding_seconds),
        }
    }

    /// Validator from configuration
    pub fn from_config(config: &PurgeConfig) -> Self {
        Self::new(config.consistency_tolerance_seconds, config.window_padding_seconds)
    }

    /// Whether `current` purges line up with `reference` ones
    ///
    /// False when the counts differ or any start pair differs in time of day
    /// by more than the tolerance. Never an error; failures are logged.
    pub fn check_consistency(&self, reference: &[TimeInterval], current: &[TimeInterval]) -> bool {
        if reference.len() != current.len() {
            log::warn!(
                "purge count differs from reference day: {} vs {}",
                current.len(),
                reference.len()
            );
            return false;
        }

        for (prev, curr) in sorted_by_start(reference).iter().zip(sorted_by_start(current).iter()) {
            let drift = time_of_day(curr.start) - time_of_day(prev.start);
            if drift > self.tolerance || drift < -self.tolerance {
                log::warn!(
                    "purge at {} drifted {:.0} s from reference purge at {}",
                    curr.start,
                    as_seconds(drift),
                    prev.start
                );
                return false;
            }
        }
        true
    }

    /// Whether a dip starting at time of day `tod` is plausible
    pub fn gate(&self, tod: Duration, windows: &[ExpectedWindow]) -> bool {
        windows.is_empty() || windows.iter().any(|w| w.admits(tod, self.padding))
    }

    /// Dips whose start passes the gate
    pub fn filter_dips(&self, dips: &[Dip], timestamps: &[Timestamp], windows: &[ExpectedWindow]) -> Vec<Dip> {
        let accepted: Vec<Dip> = dips
            .iter()
            .filter(|dip| {
                timestamps
                    .get(dip.start)
                    .is_some_and(|&ts| self.gate(time_of_day(ts), windows))
            })
            .copied()
            .collect();
        log::debug!("dip gate: accepted {} of {} dips", accepted.len(), dips.len());
        accepted
    }
}
