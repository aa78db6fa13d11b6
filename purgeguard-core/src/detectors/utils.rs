//! Windowed statistics shared by the detectors
//!
//! Standard deviations are population statistics (divide by `n`), matching
//! how the flatness thresholds were tuned. A window holding a non-finite
//! value produces NaN, and NaN never compares below a threshold, so such
//! windows are never flat.

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; NaN for an empty slice
///
/// Two-pass so that large offsets (temperatures near 280 K) do not swamp
/// the tiny spread of a held value.
pub fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    if !m.is_finite() {
        return f64::NAN;
    }
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    libm::sqrt(var)
}

/// Index range `[lo, hi)` of positions that have a full centered window
///
/// Position `i` uses samples `[i - w/2, i - w/2 + w)`. The first and last
/// `w/2` positions are excluded for both odd and even windows.
pub fn centered_range(len: usize, window: usize) -> (usize, usize) {
    let half = window / 2;
    if window == 0 || window > len || 2 * half >= len {
        return (0, 0);
    }
    (half, len - half)
}

/// Centered rolling standard deviation; NaN where the window is incomplete
pub fn rolling_std_centered(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    let (lo, hi) = centered_range(values.len(), window);
    let half = window / 2;

    for (i, slot) in out.iter_mut().enumerate().take(hi).skip(lo) {
        let start = i - half;
        *slot = population_std(&values[start..start + window]);
    }

    out
}

/// Maximum of the finite values in a slice
pub fn finite_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}
