//! Synthetic day generators shared by the integration tests
//!
//! Days are built from a smooth diurnal cycle plus a deterministic
//! alternating ripple, which keeps every rolling window well above the
//! flatness thresholds. Purge holds, near-flat spells and dips are then
//! stamped onto that background at chosen sample indices.

#![allow(dead_code)]

use std::f64::consts::PI;
use std::ops::Range;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use purgeguard_core::DaySignals;

/// Ripple added to temperature, alternating sign (K)
pub const TEMPERATURE_RIPPLE: f64 = 0.15;

/// Ripple added to humidity, cycling 0, +r, -r (%RH)
pub const HUMIDITY_RIPPLE: f64 = 0.3;

/// Humidity ripple of a near-flat spell (%RH)
pub const QUIET_RIPPLE: f64 = 0.04;

/// Depth of a stamped dip (%RH)
pub const DIP_DEPTH: f64 = 4.0;

/// One synthetic day of one-minute samples
#[derive(Debug, Clone)]
pub struct SyntheticDay {
    date: NaiveDate,
    step: Duration,
    samples: usize,
    purges: Vec<Range<usize>>,
    quiet_spells: Vec<Range<usize>>,
    dips: Vec<usize>,
    humidity_offset: f64,
}

impl SyntheticDay {
    /// Background-only day starting at midnight
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            step: Duration::minutes(1),
            samples: 1440,
            purges: Vec::new(),
            quiet_spells: Vec::new(),
            dips: Vec::new(),
            humidity_offset: 0.0,
        }
    }

    /// Hold both channels at their value at `range.start`
    pub fn with_purge(mut self, range: Range<usize>) -> Self {
        self.purges.push(range);
        self
    }

    /// Hold temperature and let humidity ripple slightly, flat but not exact
    pub fn with_quiet_spell(mut self, range: Range<usize>) -> Self {
        self.quiet_spells.push(range);
        self
    }

    /// Quiet humidity lead-in, then a dip starting at `start`
    pub fn with_dip(mut self, start: usize) -> Self {
        self.dips.push(start);
        self
    }

    /// Shift the whole humidity curve
    pub fn with_humidity_offset(mut self, offset: f64) -> Self {
        self.humidity_offset = offset;
        self
    }

    /// Sample instants
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        let t0 = self.date.and_hms_opt(0, 0, 0).unwrap();
        (0..self.samples).map(|i| t0 + self.step * i as i32).collect()
    }

    /// Temperature and humidity channels
    pub fn channels(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.samples;
        let phase = |i: usize| (2.0 * PI * i as f64 / n as f64).sin();

        let mut temperature: Vec<f64> = (0..n)
            .map(|i| {
                let ripple = if i % 2 == 0 { TEMPERATURE_RIPPLE } else { -TEMPERATURE_RIPPLE };
                283.0 + 4.0 * phase(i) + ripple
            })
            .collect();
        let mut humidity: Vec<f64> = (0..n)
            .map(|i| {
                let ripple = [0.0, HUMIDITY_RIPPLE, -HUMIDITY_RIPPLE][i % 3];
                70.0 - 10.0 * phase(i) + ripple + self.humidity_offset
            })
            .collect();

        for range in &self.purges {
            let (t, rh) = (temperature[range.start], humidity[range.start]);
            temperature[range.clone()].fill(t);
            humidity[range.clone()].fill(rh);
        }

        for range in &self.quiet_spells {
            let (t, rh) = (temperature[range.start], humidity[range.start]);
            temperature[range.clone()].fill(t);
            for i in range.clone() {
                humidity[i] = rh + if i % 2 == 0 { QUIET_RIPPLE } else { -QUIET_RIPPLE };
            }
        }

        for &start in &self.dips {
            let held = humidity[start - 1];
            humidity[start - 6..start].fill(held);
            humidity[start] = held - DIP_DEPTH;
            humidity[start + 1] = held - 3.5;
            humidity[start + 2] = held - 2.0;
            humidity[start + 3] = held - 1.0;
            humidity[start + 4] = held + 0.2;
        }

        (temperature, humidity)
    }

    /// Validated signals
    pub fn build(&self) -> DaySignals {
        let (temperature, humidity) = self.channels();
        DaySignals::new(self.timestamps(), temperature, humidity).unwrap()
    }
}

/// A date before the single-purge cutover
pub fn twice_daily_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 7, 3).unwrap()
}

/// A date after the single-purge cutover
pub fn once_daily_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 7, 3).unwrap()
}

/// Instant `h:m` on `date`
pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}
