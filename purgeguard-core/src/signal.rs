//! One day of aligned temperature and humidity samples
//!
//! `DaySignals` is the engine's only input shape. Construction sorts the
//! samples by time and then enforces the invariants every detector relies on:
//! at least two samples, both channels aligned with the timestamps, and
//! strictly increasing instants. Violations fail fast with the index or
//! channel at fault.

use crate::{
    errors::{QcError, QcResult},
    time::{SamplingInterval, Timestamp},
};

/// Minimum number of samples for a usable day
pub const MIN_SAMPLES: usize = 2;

/// Time-sorted temperature (K) and relative humidity (%) for one period
#[derive(Debug, Clone, PartialEq)]
pub struct DaySignals {
    timestamps: Vec<Timestamp>,
    temperature: Vec<f64>,
    humidity: Vec<f64>,
    sampling: SamplingInterval,
}

impl DaySignals {
    /// Build from possibly unsorted samples
    pub fn new(
        timestamps: Vec<Timestamp>,
        temperature: Vec<f64>,
        humidity: Vec<f64>,
    ) -> QcResult<Self> {
        if timestamps.is_empty() {
            return Err(QcError::EmptySignal);
        }
        check_channel_len("temperature", timestamps.len(), temperature.len())?;
        check_channel_len("humidity", timestamps.len(), humidity.len())?;
        if timestamps.len() < MIN_SAMPLES {
            return Err(QcError::InsufficientData {
                required: MIN_SAMPLES,
                available: timestamps.len(),
            });
        }

        let (timestamps, temperature, humidity) = sort_by_time(timestamps, temperature, humidity);
        check_strictly_increasing(&timestamps)?;

        let sampling = SamplingInterval::from_timestamps(&timestamps)?;

        Ok(Self {
            timestamps,
            temperature,
            humidity,
            sampling,
        })
    }

    /// Sample instants, strictly increasing
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Air temperature values
    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// Relative humidity values
    pub fn humidity(&self) -> &[f64] {
        &self.humidity
    }

    /// Median sample spacing
    pub fn sampling(&self) -> SamplingInterval {
        self.sampling
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false; a constructed day holds at least two samples
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Date of the first sample, used for the cutover policy
    pub fn date(&self) -> chrono::NaiveDate {
        self.timestamps[0].date()
    }
}

fn check_channel_len(channel: &'static str, expected: usize, actual: usize) -> QcResult<()> {
    if expected != actual {
        return Err(QcError::LengthMismatch {
            channel,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Strictly increasing check; returns the first offending index
pub(crate) fn check_strictly_increasing(timestamps: &[Timestamp]) -> QcResult<()> {
    match timestamps.windows(2).position(|w| w[1] <= w[0]) {
        Some(pos) => Err(QcError::NonMonotonicTimestamps { index: pos + 1 }),
        None => Ok(()),
    }
}

fn sort_by_time(
    timestamps: Vec<Timestamp>,
    temperature: Vec<f64>,
    humidity: Vec<f64>,
) -> (Vec<Timestamp>, Vec<f64>, Vec<f64>) {
    if timestamps.windows(2).all(|w| w[0] <= w[1]) {
        return (timestamps, temperature, humidity);
    }

    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    // Stable so duplicate instants keep their order and are reported below
    order.sort_by_key(|&i| timestamps[i]);

    (
        order.iter().map(|&i| timestamps[i]).collect(),
        order.iter().map(|&i| temperature[i]).collect(),
        order.iter().map(|&i| humidity[i]).collect(),
    )
}
