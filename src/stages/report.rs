//! Final analysis output

use super::probability::{count_bullish_engulfing, ProbabilityCurves, ProbabilityPoint};
use crate::{AnalysisConfig, Event, Period};

/// Filtered events, their engulfing count, the window sizes used, and both
/// probability curves.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub events: Vec<Event>,
    pub bullish_engulfing_event_count: usize,
    pub lookahead_candles: Period,
    pub lookbehind_candles: Period,
    pub probabilities: Vec<ProbabilityPoint>,
    pub control_probabilities: Vec<ProbabilityPoint>,
}

impl AnalysisReport {
    pub fn assemble(events: Vec<Event>, config: &AnalysisConfig, curves: ProbabilityCurves) -> Self {
        Self {
            bullish_engulfing_event_count: count_bullish_engulfing(&events),
            events,
            lookahead_candles: config.lookahead_candles,
            lookbehind_candles: config.lookbehind_candles,
            probabilities: curves.probabilities,
            control_probabilities: curves.control_probabilities,
        }
    }

    #[inline]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn engulfing_events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(|e| e.is_bullish_engulfing)
    }

    /// Engulfing minus control probability at each threshold.
    ///
    /// Positive values mean price cleared the threshold more often after a
    /// bullish engulfing candle than after an arbitrary one.
    pub fn edge(&self) -> Vec<ProbabilityPoint> {
        self.probabilities
            .iter()
            .zip(&self.control_probabilities)
            .map(|(p, c)| ProbabilityPoint {
                pct_price_change: p.pct_price_change,
                probability: p.probability - c.probability,
            })
            .collect()
    }
}
