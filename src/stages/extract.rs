//! Event extraction: per-candle metrics and the bullish engulfing rule
//!
//! A candle at index `i` is bullish engulfing when its body is bullish, taller
//! than every body in the `lookbehind` candles before it, and its volume beats
//! all of theirs. Forward extremes come from the next `lookahead` candles,
//! clipped at the end of the input.

use crate::{
    format::{format_usd, format_utc_minutes},
    stats::{max_keep_nan, min_keep_nan},
    Event, OHLCVExt, Period, OHLCV,
};

/// Largest body and volume across a lookbehind window.
///
/// Both are `-inf` for an empty window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookbehindExtremes {
    pub max_body: f64,
    pub max_volume: f64,
}

/// Highest high and lowest low across a lookahead window.
///
/// `max_high` is `-inf` and `min_low` is `+inf` for an empty window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadExtremes {
    pub max_high: f64,
    pub min_low: f64,
}

pub fn lookbehind_extremes<T: OHLCV>(window: &[T]) -> LookbehindExtremes {
    window.iter().fold(
        LookbehindExtremes {
            max_body: f64::NEG_INFINITY,
            max_volume: f64::NEG_INFINITY,
        },
        |acc, candle| LookbehindExtremes {
            max_body: max_keep_nan(acc.max_body, candle.body()),
            max_volume: max_keep_nan(acc.max_volume, candle.volume()),
        },
    )
}

pub fn lookahead_extremes<T: OHLCV>(window: &[T]) -> LookaheadExtremes {
    window.iter().fold(
        LookaheadExtremes {
            max_high: f64::NEG_INFINITY,
            min_low: f64::INFINITY,
        },
        |acc, candle| LookaheadExtremes {
            max_high: max_keep_nan(acc.max_high, candle.high()),
            min_low: min_keep_nan(acc.min_low, candle.low()),
        },
    )
}

/// The three-part engulfing rule; all comparisons are strict.
#[inline]
pub fn is_bullish_engulfing(signed_body: f64, volume: f64, recent: &LookbehindExtremes) -> bool {
    signed_body > 0.0 && signed_body > recent.max_body && volume > recent.max_volume
}

/// Build the event for `candles[index]`.
///
/// Returns `None` when fewer than `lookbehind` candles precede `index` or
/// `index` is out of bounds.
pub fn extract_event_at<T: OHLCV>(
    candles: &[T],
    index: usize,
    lookbehind: Period,
    lookahead: Period,
) -> Option<Event> {
    let candle = candles.get(index)?;
    let start = index.checked_sub(lookbehind.get())?;

    let recent = lookbehind_extremes(&candles[start..index]);
    let ahead_end = index
        .saturating_add(lookahead.get())
        .min(candles.len() - 1);
    let ahead = lookahead_extremes(&candles[index + 1..=ahead_end]);

    let signed_body = candle.signed_body();
    let high = candle.high();

    Some(Event {
        candle_index: index,
        price: format_usd(candle.close()),
        time: format_utc_minutes(candle.time()),
        pct_volume_change: candle.volume() / recent.max_volume - 1.0,
        max_pct_price_change: ahead.max_high / high - 1.0,
        min_pct_price_change: ahead.min_low / high - 1.0,
        is_bullish_engulfing: is_bullish_engulfing(signed_body, candle.volume(), &recent),
    })
}

/// One event per candle from index `lookbehind` to the end, in input order.
pub fn extract_events<T: OHLCV>(candles: &[T], lookbehind: Period, lookahead: Period) -> Vec<Event> {
    (lookbehind.get()..candles.len())
        .filter_map(|i| extract_event_at(candles, i, lookbehind, lookahead))
        .collect()
}
