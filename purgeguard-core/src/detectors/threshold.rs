//! Level predicates
//!
//! Two plain value thresholds complete the flatness test:
//!
//! - **Saturation**: in fog or dew the humidity sensor pins near 100 % and
//!   looks just as flat as a purge hold. Samples at or above the ceiling are
//!   excluded from purge candidates.
//! - **Below threshold**: the optional low-temperature pass marks samples
//!   under the instrument's specified range.

use crate::traits::{Mask, MaskDetector};

/// Marks samples at or above a humidity ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationFilter {
    ceiling: f64,
}

impl SaturationFilter {
    /// Filter with the given ceiling (%RH)
    pub fn new(ceiling: f64) -> Self {
        Self { ceiling }
    }

    /// Ceiling in %RH
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }
}

impl MaskDetector for SaturationFilter {
    fn detect(&self, values: &[f64]) -> Mask {
        values.iter().map(|&v| v >= self.ceiling).collect()
    }

    fn name(&self) -> &'static str {
        "saturation"
    }
}

/// Marks samples strictly below a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BelowThreshold {
    threshold: f64,
}

impl BelowThreshold {
    /// Detector for values `< threshold`
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl MaskDetector for BelowThreshold {
    fn detect(&self, values: &[f64]) -> Mask {
        values.iter().map(|&v| v < self.threshold).collect()
    }

    fn name(&self) -> &'static str {
        "below_threshold"
    }
}
