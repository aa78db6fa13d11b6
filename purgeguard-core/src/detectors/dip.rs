//! Humidity Dip Detection
//!
//! ## What a Dip Looks Like
//!
//! After a purge the heated probe releases its held reading and humidity can
//! drop sharply for a few samples before climbing back:
//!
//! ```text
//! RH %  ______________            ______
//!       (quiet/held)  \          /
//!                      \___ ___ /
//!                      i        j
//!       max(rh[i-3..i]) - rh[i] >= drop      (sharp drop at i)
//!       rh[j] - rh[i]   >= that drop         (full recovery at j)
//!       t[j] - t[i]     <= recovery time
//! ```
//!
//! A drop only counts when the signal was quiet just before it, so at least
//! one of the trailing `flat_window` samples must pass a looser flatness test.
//!
//! ## Overlapping Pairs
//!
//! Every start index is evaluated on its own and the scan does not skip past
//! a found recovery. One perceptual dip can therefore produce several
//! overlapping `(i, j)` pairs (the next sample may still be far enough below
//! the pre-dip maximum). Callers see all of them; the compositor's flags are
//! the same either way.

use serde::{Deserialize, Serialize};

use crate::{
    config::DipConfig,
    errors::QcResult,
    time::{as_seconds, Timestamp},
    traits::MaskDetector,
};

use super::{flat::FlatRegionDetector, utils};

/// One detected dip: drop at `start`, recovered at `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dip {
    /// Index of the low sample that starts the dip
    pub start: usize,
    /// Index of the first sample back at the pre-dip level
    pub end: usize,
    /// Pre-dip maximum minus the value at `start`
    pub drop: f64,
}

/// Scanner for sharp humidity drops with fast recovery
#[derive(Debug, Clone, PartialEq)]
pub struct DipDetector {
    drop_threshold: f64,
    recovery_seconds: f64,
    search_width: usize,
    lookback: usize,
    tail_margin: usize,
    flat_window: usize,
    flat: FlatRegionDetector,
}

impl DipDetector {
    /// Build from the dip section of the configuration
    pub fn from_config(config: &DipConfig) -> QcResult<Self> {
        Ok(Self {
            drop_threshold: config.drop_threshold,
            recovery_seconds: config.recovery_seconds,
            search_width: config.search_width,
            lookback: config.lookback,
            tail_margin: config.tail_margin,
            flat_window: config.flat_window,
            flat: FlatRegionDetector::new(config.flat_window, config.flat_threshold)?,
        })
    }

    /// Maximum distance between a dip start and its recovery
    pub fn search_width(&self) -> usize {
        self.search_width
    }

    /// Scan `humidity` for dips; `timestamps` must be aligned with it
    pub fn detect(&self, humidity: &[f64], timestamps: &[Timestamp]) -> Vec<Dip> {
        let n = humidity.len().min(timestamps.len());
        let quiet = self.flat.detect(&humidity[..n]);
        let mut dips = Vec::new();

        let first = self.lookback.max(1);
        let last = n.saturating_sub(self.tail_margin);

        for i in first..last {
            // Only a drop out of a quiet stretch counts
            if !quiet[i.saturating_sub(self.flat_window)..i].iter().any(|&q| q) {
                continue;
            }

            let Some(max_before) = utils::finite_max(&humidity[i - self.lookback.min(i)..i]) else {
                continue;
            };
            let drop = max_before - humidity[i];
            if drop.is_nan() || drop < self.drop_threshold {
                continue;
            }

            if let Some(end) = self.find_recovery(humidity, timestamps, i, drop, n) {
                dips.push(Dip { start: i, end, drop });
            }
        }

        log::debug!("dip scan: {} candidate dips in {} samples", dips.len(), n);
        dips
    }

    /// Earliest `j` that climbs back by `drop` within the recovery time
    fn find_recovery(
        &self,
        humidity: &[f64],
        timestamps: &[Timestamp],
        i: usize,
        drop: f64,
        n: usize,
    ) -> Option<usize> {
        let stop = i.saturating_add(self.search_width).min(n);
        ((i + 1)..stop).find(|&j| {
            let rise = humidity[j] - humidity[i];
            let elapsed = as_seconds(timestamps[j] - timestamps[i]);
            rise >= drop && elapsed <= self.recovery_seconds
        })
    }
}
