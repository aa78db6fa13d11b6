//! Flat Region Detection
//!
//! ## Why Flatness?
//!
//! During a purge the HMP155 holds both outputs at the value it read when the
//! purge started. Real air temperature and humidity never sit perfectly still
//! for minutes at a time, so a span whose rolling standard deviation collapses
//! in *both* channels is a strong purge signature:
//!
//! ```text
//! RH %  ~~~~~~~~~~\______________/~~~~~~
//!                 |<-- held -->|
//! std   ----------\____________/-------  < threshold => flat
//! ```
//!
//! The statistic is computed on the raw signal. Smoothing first would blur
//! the sharp edges of the hold.
//!
//! ## Edge Policy
//!
//! Positions without a full centered window are reported as not flat rather
//! than raising an error. With window `w` that is the first and last `w/2`
//! samples of the record.

use crate::{
    errors::{QcError, QcResult},
    traits::{Mask, MaskDetector},
};

use super::utils;

/// Rolling standard deviation threshold detector
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRegionDetector {
    /// Window length in samples
    window: usize,

    /// Strict upper bound on the local standard deviation
    threshold: f64,
}

impl FlatRegionDetector {
    /// Detector with a window of `window` samples
    pub fn new(window: usize, threshold: f64) -> QcResult<Self> {
        if window == 0 {
            return Err(QcError::InvalidConfig {
                field: "window",
                reason: "flat window must cover at least one sample",
            });
        }
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(QcError::InvalidConfig {
                field: "threshold",
                reason: "flat threshold must be a finite, non-negative number",
            });
        }
        Ok(Self { window, threshold })
    }

    /// Window length in samples
    pub fn window(&self) -> usize {
        self.window
    }

    /// Standard deviation threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Centered rolling standard deviation, NaN at the edges
    pub fn rolling_std(&self, values: &[f64]) -> Vec<f64> {
        utils::rolling_std_centered(values, self.window)
    }
}

impl MaskDetector for FlatRegionDetector {
    fn detect(&self, values: &[f64]) -> Mask {
        self.rolling_std(values)
            .into_iter()
            // NaN edges compare false
            .map(|std| std < self.threshold)
            .collect()
    }

    fn name(&self) -> &'static str {
        "flat"
    }
}
