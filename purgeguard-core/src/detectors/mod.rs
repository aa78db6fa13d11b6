//! Signal-Shape Detectors
//!
//! ## Overview
//!
//! Purges and their after-effects are recognised from the shape of the raw
//! signal alone. No instrument status channel is needed.
//!
//! ### 1. Flatness
//! A purge holds both channels at a fixed value. The centered rolling
//! standard deviation collapses in temperature *and* humidity at once:
//! ```rust
//! use purgeguard_core::detectors::FlatRegionDetector;
//! use purgeguard_core::traits::MaskDetector;
//!
//! // 8-minute window on one-minute data, 0.07 K threshold
//! let flat = FlatRegionDetector::new(8, 0.07)?;
//! let mask = flat.detect(&[283.1; 30]);
//! assert!(mask[4..26].iter().all(|&f| f));
//! # Ok::<(), purgeguard_core::QcError>(())
//! ```
//!
//! ### 2. Saturation Exclusion
//! Fog pins humidity near 100 % and looks just as flat. Samples at or above
//! the saturation ceiling are removed from purge candidates.
//!
//! ### 3. Dips
//! When the probe releases its hold, humidity may plunge and recover within a
//! few minutes. [`DipDetector`] finds these, but only out of a quiet stretch.
//!
//! ## Combining Channels
//!
//! ```text
//! purge = flat(T) AND flat(RH) AND NOT saturated(RH)
//! ```
//!
//! [`purge_mask`] builds exactly this from configured detectors.

mod dip;
mod flat;
mod threshold;
pub(crate) mod utils;

pub use dip::{Dip, DipDetector};
pub use flat::FlatRegionDetector;
pub use threshold::{BelowThreshold, SaturationFilter};

use crate::traits::{and_masks, and_not_masks, Mask, MaskDetector};

/// `flat(temperature) AND flat(humidity) AND NOT saturated(humidity)`
pub fn purge_mask(
    temperature: &[f64],
    humidity: &[f64],
    temperature_flat: &FlatRegionDetector,
    humidity_flat: &FlatRegionDetector,
    saturation: &SaturationFilter,
) -> Mask {
    let flat_t = temperature_flat.detect(temperature);
    let flat_rh = humidity_flat.detect(humidity);
    let saturated = saturation.detect(humidity);

    log::debug!(
        "purge mask: {} {} T, {} {} RH, {} {} (>= {}) of {}",
        flat_t.iter().filter(|&&f| f).count(),
        temperature_flat.name(),
        flat_rh.iter().filter(|&&f| f).count(),
        humidity_flat.name(),
        saturated.iter().filter(|&&s| s).count(),
        saturation.name(),
        saturation.ceiling(),
        humidity.len(),
    );

    and_masks(&flat_t, &and_not_masks(&flat_rh, &saturated))
}
