//! Threshold grid and empirical probability curves
//!
//! For each threshold `t` the control probability is the share of filtered
//! events whose `max_pct_price_change` exceeds `t`, and the engulfing
//! probability is the same share taken over bullish engulfing events only.

use crate::{
    stats::{max_keep_nan, min_keep_nan, round_to_increment},
    Event, GroupSize,
};

/// One point of a probability curve
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityPoint {
    /// Threshold on `max_pct_price_change`
    pub pct_price_change: f64,
    pub probability: f64,
}

/// Engulfing and control curves over one shared threshold grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityCurves {
    pub probabilities: Vec<ProbabilityPoint>,
    pub control_probabilities: Vec<ProbabilityPoint>,
}

#[inline]
pub fn count_bullish_engulfing(events: &[Event]) -> usize {
    events.iter().filter(|e| e.is_bullish_engulfing).count()
}

/// Thresholds from `max(0, round(min(min_pct_price_change)))` up to
/// `max(max_pct_price_change)`, stepping by repeated addition of `group_size`.
///
/// Empty for an empty event list, and for any NaN bound. A non-finite upper
/// bound, or a step too small to move the accumulator, ends the grid early
/// with a warning.
pub fn threshold_grid(events: &[Event], group_size: GroupSize) -> Vec<f64> {
    let step = group_size.get();

    let lowest = events
        .iter()
        .map(|e| e.min_pct_price_change)
        .fold(f64::INFINITY, min_keep_nan);
    let end = events
        .iter()
        .map(|e| e.max_pct_price_change)
        .fold(f64::NEG_INFINITY, max_keep_nan);
    let start = max_keep_nan(0.0, round_to_increment(lowest, step));

    if end == f64::INFINITY {
        tracing::warn!(start, "threshold grid has no finite upper bound, skipping");
        return Vec::new();
    }

    let mut grid = Vec::new();
    let mut t = start;
    while t <= end {
        grid.push(t);
        let next = t + step;
        if next <= t {
            tracing::warn!(t, step, "threshold step no longer advances, truncating grid");
            break;
        }
        t = next;
    }
    grid
}

/// Build both curves over [`threshold_grid`].
///
/// With no bullish engulfing events every engulfing probability is NaN (0/0).
pub fn build_probabilities(events: &[Event], group_size: GroupSize) -> ProbabilityCurves {
    let grid = threshold_grid(events, group_size);
    let engulfing_total = count_bullish_engulfing(events) as f64;
    let control_total = events.len() as f64;

    let mut curves = ProbabilityCurves {
        probabilities: Vec::with_capacity(grid.len()),
        control_probabilities: Vec::with_capacity(grid.len()),
    };

    for &t in &grid {
        let (control, engulfing) = events
            .iter()
            .filter(|e| e.max_pct_price_change > t)
            .fold((0usize, 0usize), |(c, b), e| {
                (c + 1, b + usize::from(e.is_bullish_engulfing))
            });

        curves.probabilities.push(ProbabilityPoint {
            pct_price_change: t,
            probability: engulfing as f64 / engulfing_total,
        });
        curves.control_probabilities.push(ProbabilityPoint {
            pct_price_change: t,
            probability: control as f64 / control_total,
        });
    }

    tracing::debug!(
        thresholds = grid.len(),
        engulfing = engulfing_total,
        control = control_total,
        "probability curves"
    );
    curves
}
