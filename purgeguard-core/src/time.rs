//! Instants, time of day and sampling intervals
//!
//! Timestamps are naive wall-clock instants as written by the logger. Purges
//! are scheduled by the instrument's own clock, so "noon" and "midnight" are
//! taken from the timestamp itself without any zone conversion.
//!
//! Sample counts are always derived from the median spacing of the record,
//! which tolerates the occasional dropped or duplicated logger line.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::{
    constants::time::{NANOS_PER_SECOND, NOON_HOUR, SECONDS_PER_HOUR, SECONDS_PER_MINUTE},
    errors::{QcError, QcResult},
};

/// Wall-clock instant of a sample
pub type Timestamp = NaiveDateTime;

/// Duration since the midnight of `ts`'s own date
pub fn time_of_day(ts: Timestamp) -> Duration {
    let time = ts.time();
    Duration::seconds(i64::from(time.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(time.nanosecond()))
}

/// Midnight at the start of `ts`'s date
pub fn midnight_of(ts: Timestamp) -> Timestamp {
    ts - time_of_day(ts)
}

/// Noon of `ts`'s date
pub fn noon_of(ts: Timestamp) -> Timestamp {
    midnight_of(ts) + Duration::hours(i64::from(NOON_HOUR))
}

/// Duration as fractional seconds
pub fn as_seconds(duration: Duration) -> f64 {
    match duration.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_SECOND,
        // Beyond ~292 years; millisecond precision is plenty there
        None => duration.num_milliseconds() as f64 / 1000.0,
    }
}

/// Duration from fractional seconds, rounded to the nanosecond
pub fn from_seconds(seconds: f64) -> Duration {
    Duration::nanoseconds(libm::round(seconds * NANOS_PER_SECOND) as i64)
}

/// Median of finite values; the mean of the middle pair for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;

    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) * 0.5)
    } else {
        Some(v[mid])
    }
}

/// Nominal spacing between samples of one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingInterval {
    seconds: f64,
}

impl SamplingInterval {
    /// Interval from a positive number of seconds
    pub fn from_seconds(seconds: f64) -> QcResult<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(QcError::InvalidSamplingInterval);
        }
        Ok(Self { seconds })
    }

    /// Median of consecutive differences of sorted timestamps
    pub fn from_timestamps(timestamps: &[Timestamp]) -> QcResult<Self> {
        if timestamps.len() < 2 {
            return Err(QcError::InsufficientData {
                required: 2,
                available: timestamps.len(),
            });
        }

        let diffs: Vec<f64> = timestamps
            .windows(2)
            .map(|w| as_seconds(w[1] - w[0]))
            .collect();

        let seconds = median(&diffs).ok_or(QcError::InvalidSamplingInterval)?;
        Self::from_seconds(seconds)
    }

    /// Interval length in seconds
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Interval as a chrono duration
    pub fn duration(&self) -> Duration {
        from_seconds(self.seconds)
    }

    /// Whole samples that fit in `seconds` (truncating)
    pub fn samples_in_seconds(&self, seconds: f64) -> usize {
        if seconds <= 0.0 {
            return 0;
        }
        libm::floor(seconds / self.seconds) as usize
    }

    /// Whole samples that fit in `minutes` (truncating)
    pub fn samples_in_minutes(&self, minutes: f64) -> usize {
        self.samples_in_seconds(minutes * SECONDS_PER_MINUTE)
    }

    /// Whole samples that fit in `hours` (truncating)
    pub fn samples_in_hours(&self, hours: f64) -> usize {
        self.samples_in_seconds(hours * SECONDS_PER_HOUR)
    }
}
