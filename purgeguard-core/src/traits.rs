//! Core traits for mask-producing detectors
//!
//! Every per-sample predicate in the engine (flatness, saturation, low value)
//! turns a channel into a boolean mask of the same length. Keeping them behind
//! one trait lets the engine combine them without caring which is which.

/// Boolean per-sample mask, aligned index-for-index with a signal
pub type Mask = Vec<bool>;

/// A detector that marks samples of one channel
pub trait MaskDetector {
    /// Mark samples; the result always has `values.len()` entries
    fn detect(&self, values: &[f64]) -> Mask;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Element-wise AND of two aligned masks
///
/// The shorter length wins; callers only combine masks of one signal.
pub fn and_masks(a: &[bool], b: &[bool]) -> Mask {
    a.iter().zip(b).map(|(&x, &y)| x && y).collect()
}

/// Element-wise `a AND NOT b`
pub fn and_not_masks(a: &[bool], b: &[bool]) -> Mask {
    a.iter().zip(b).map(|(&x, &y)| x && !y).collect()
}
