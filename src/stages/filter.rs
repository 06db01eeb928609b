//! IQR outlier filtering over the extracted events
//!
//! Each metric column gets a fence `(Q25 - 1.5 * IQR, Q75 + 1.5 * IQR)` and an
//! event survives only if all three of its metrics lie strictly inside.
//! A NaN anywhere in a column makes its fence NaN, which admits nothing.
//!
//! Under [`VolumeFence::Compatible`] the `pct_volume_change` fence is centered
//! on the quartiles of `max_pct_price_change` and only widened by the volume
//! IQR. Reports generated before the fence was configurable used that rule,
//! so it stays the default.

use crate::{
    stats::{quartiles, IQR_FENCE_FACTOR},
    Event, Result, VolumeFence,
};

/// Open interval an admitted metric must fall strictly inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub low: f64,
    pub high: f64,
}

impl Fence {
    /// Fence around `(q25, q75)` widened by `margin` on both sides
    #[inline]
    pub fn around(q25: f64, q75: f64, margin: f64) -> Self {
        Self {
            low: q25 - margin,
            high: q75 + margin,
        }
    }

    /// Standard Tukey fence for a quartile pair
    #[inline]
    pub fn from_quartiles(q25: f64, q75: f64) -> Self {
        Self::around(q25, q75, iqr_margin(q25, q75))
    }

    /// NaN fails on both sides
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value < self.high
    }
}

#[inline]
fn iqr_margin(q25: f64, q75: f64) -> f64 {
    (q75 - q25) * IQR_FENCE_FACTOR
}

/// One fence per filtered metric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFences {
    pub pct_volume_change: Fence,
    pub max_pct_price_change: Fence,
    pub min_pct_price_change: Fence,
}

impl OutlierFences {
    /// Compute fences from a non-empty event sample.
    ///
    /// Fails with [`AnalysisError::EmptySample`](crate::AnalysisError::EmptySample)
    /// when `events` is empty.
    pub fn compute(events: &[Event], mode: VolumeFence) -> Result<Self> {
        let column = |f: fn(&Event) -> f64| events.iter().map(f).collect::<Vec<f64>>();

        let (vol25, vol75) = quartiles(&column(|e: &Event| e.pct_volume_change))?;
        let (max25, max75) = quartiles(&column(|e: &Event| e.max_pct_price_change))?;
        let (min25, min75) = quartiles(&column(|e: &Event| e.min_pct_price_change))?;

        let pct_volume_change = match mode {
            VolumeFence::Compatible => Fence::around(max25, max75, iqr_margin(vol25, vol75)),
            VolumeFence::OwnQuartiles => Fence::from_quartiles(vol25, vol75),
        };

        Ok(Self {
            pct_volume_change,
            max_pct_price_change: Fence::from_quartiles(max25, max75),
            min_pct_price_change: Fence::from_quartiles(min25, min75),
        })
    }

    pub fn admits(&self, event: &Event) -> bool {
        self.pct_volume_change.contains(event.pct_volume_change)
            && self.max_pct_price_change.contains(event.max_pct_price_change)
            && self.min_pct_price_change.contains(event.min_pct_price_change)
    }
}

/// Drop outliers, preserving order. An empty input stays empty.
pub fn filter_outliers(mut events: Vec<Event>, mode: VolumeFence) -> Result<Vec<Event>> {
    if events.is_empty() {
        return Ok(events);
    }

    let fences = OutlierFences::compute(&events, mode)?;
    tracing::trace!(?fences, "outlier fences");

    events.retain(|e| fences.admits(e));
    Ok(events)
}
