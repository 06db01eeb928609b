//! Numeric helpers shared by the pipeline stages
//!
//! Quantile estimation for the IQR fences and increment rounding for the
//! probability threshold grid.

use crate::{AnalysisError, Result};

/// Multiplier applied to the interquartile range when building outlier fences.
pub const IQR_FENCE_FACTOR: f64 = 1.5;

/// Lower quartile probability.
pub const Q25: f64 = 0.25;
/// Upper quartile probability.
pub const Q75: f64 = 0.75;

// ============================================================
// QUANTILES
// ============================================================

/// Quantiles of `values` at each probability in `probs`, by linear
/// interpolation between order statistics.
///
/// Position is `p * (n - 1)` over the ascending sample; a fractional position
/// between `left` and `right` yields `right * frac + left * (1 - frac)`.
/// Infinities sort to the ends and interpolate with IEEE semantics, so a
/// quartile next to an infinite sample is itself infinite (or NaN).
///
/// A sample containing NaN has no order: every requested quantile is NaN,
/// whatever the sign bit of the NaN.
pub fn quantiles(values: &[f64], probs: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(AnalysisError::EmptySample);
    }
    if let Some(&p) = probs.iter().find(|p| p.is_nan() || !(0.0..=1.0).contains(*p)) {
        return Err(AnalysisError::OutOfRange {
            field: "quantile probability",
            value: p,
            min: 0.0,
            max: 1.0,
        });
    }

    if values.iter().any(|v| v.is_nan()) {
        return Ok(vec![f64::NAN; probs.len()]);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(probs.iter().map(|&p| interpolate(&sorted, p)).collect())
}

/// Lower and upper quartile of `values`.
#[inline]
pub fn quartiles(values: &[f64]) -> Result<(f64, f64)> {
    let q = quantiles(values, &[Q25, Q75])?;
    Ok((q[0], q[1]))
}

fn interpolate(sorted: &[f64], p: f64) -> f64 {
    let index = p * (sorted.len() - 1) as f64;
    let frac = index.fract();
    let left = index.floor() as usize;

    if frac == 0.0 {
        return sorted[left];
    }

    let right = (left + 1).min(sorted.len() - 1);
    sorted[right] * frac + sorted[left] * (1.0 - frac)
}

// ============================================================
// ROUNDING
// ============================================================

/// Round `value` to the nearest multiple of `increment`, ties toward +inf.
///
/// NaN and infinities pass through unchanged in kind.
#[inline]
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment + 0.5).floor() * increment
}

/// `max` that keeps NaN instead of discarding it like [`f64::max`].
#[inline]
pub(crate) fn max_keep_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// `min` counterpart of [`max_keep_nan`].
#[inline]
pub(crate) fn min_keep_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

// ============================================================
// TESTS
// ============================================================
