//! # engulfing-odds
//!
//! Bullish engulfing detection with empirical forward price-move probabilities.
//!
//! Every candle with a full lookbehind window becomes an [`Event`]. Events are
//! pruned with IQR fences, then bucketed on a grid of percentage thresholds to
//! estimate how often price rose past each threshold within the lookahead
//! window, once for bullish engulfing events and once for all events (the
//! control curve).
//!
//! ## Quick Start
//!
//! ```rust
//! use engulfing_odds::prelude::*;
//!
//! let candles: Vec<Candle> = (0..50)
//!     .map(|i| {
//!         let base = 100.0 + (i % 7) as f64;
//!         Candle::new(i * 3600, base, base + 2.0, base - 1.0, base + 0.5, 1000.0 + (i % 5) as f64)
//!     })
//!     .collect();
//!
//! let analyzer = AnalyzerBuilder::new()
//!     .lookbehind_candles(3)
//!     .lookahead_candles(5)
//!     .group_size(0.01)
//!     .build()
//!     .unwrap();
//!
//! let report = analyzer.analyze(&candles).unwrap();
//! assert_eq!(report.probabilities.len(), report.control_probabilities.len());
//! ```

pub mod format;
pub mod params;
pub mod stages;
pub mod stats;

pub mod prelude {
    pub use crate::{
        // Parallel
        analyze,
        analyze_parallel,
        // Parameters
        params::{ParamMeta, ParamType},
        // Stages
        stages::*,
        // Config
        AnalysisConfig,
        // Errors
        AnalysisError,
        // Engine
        Analyzer,
        AnalyzerBuilder,
        // Types
        Candle,
        Event,
        GroupSize,
        InstrumentError,
        InstrumentReport,
        OHLCVExt,
        Period,
        Result,
        VolumeFence,
        // Core traits
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while configuring or running an analysis
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: &'static str },

    #[error("Candles not sorted by time at index {index}")]
    UnsortedCandles { index: usize },

    #[error("Quantile of an empty sample is undefined")]
    EmptySample,
}

pub const LOOKBEHIND_ERROR: &str = "lookbehindCandles must be a positive integer";
pub const LOOKAHEAD_ERROR: &str = "lookaheadCandles must be a positive integer";
pub const GROUP_SIZE_ERROR: &str =
    "groupSizeForPctPriceIncreaseProbability must be a positive number";

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Window length in candles (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(AnalysisError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

/// Width of one bucket on the threshold grid (finite, > 0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct GroupSize(f64);

impl GroupSize {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(AnalysisError::InvalidValue(
                "GroupSize cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(AnalysisError::InvalidValue("GroupSize must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for GroupSize {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for GroupSize {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        GroupSize::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    /// Bar open time in unix seconds
    fn time(&self) -> i64;
}

/// Blanket impl for references to dyn OHLCV
impl OHLCV for &dyn OHLCV {
    fn open(&self) -> f64 {
        (*self).open()
    }

    fn high(&self) -> f64 {
        (*self).high()
    }

    fn low(&self) -> f64 {
        (*self).low()
    }

    fn close(&self) -> f64 {
        (*self).close()
    }

    fn volume(&self) -> f64 {
        (*self).volume()
    }

    fn time(&self) -> i64 {
        (*self).time()
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    /// `close - open`; positive for a bullish bar
    #[inline]
    fn signed_body(&self) -> f64 {
        self.close() - self.open()
    }

    #[inline]
    fn body(&self) -> f64 {
        self.signed_body().abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.signed_body() > 0.0
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
            || self.volume().is_nan()
        {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
            || self.volume().is_infinite()
        {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.high() < self.low() {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "high < low",
            });
        }
        if self.volume() < 0.0 {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "negative volume",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// CANDLE
// ============================================================

/// Plain OHLCV bar for callers without their own bar type
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    /// Unix seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn time(&self) -> i64 {
        self.time
    }
}

// ============================================================
// EVENT - one per candle with a full lookbehind window
// ============================================================

/// Derived metrics for a single candle.
///
/// `pct_volume_change` is infinite or NaN when the lookbehind volumes are all
/// zero; `max_pct_price_change` is `-inf` and `min_pct_price_change` is `+inf`
/// when the lookahead window is empty (last candle).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Position of the source candle in the input slice
    #[serde(skip)]
    pub candle_index: usize,
    /// Close price, US currency formatted
    pub price: String,
    /// Candle time, `YYYY-MM-DD HH:MM UTC`
    pub time: String,
    pub pct_volume_change: f64,
    pub max_pct_price_change: f64,
    pub min_pct_price_change: f64,
    pub is_bullish_engulfing: bool,
}

// ============================================================
// CONFIGURATION
// ============================================================

pub const DEFAULT_LOOKBEHIND_CANDLES: usize = 10;
pub const DEFAULT_LOOKAHEAD_CANDLES: usize = 10;
pub const DEFAULT_GROUP_SIZE: f64 = 0.01;

/// How the `pct_volume_change` outlier fence is centered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeFence {
    /// Quartiles of `max_pct_price_change`, widened by the volume IQR.
    /// Matches historical reports produced by this analysis.
    #[default]
    Compatible,
    /// Quartiles and IQR of `pct_volume_change` itself.
    OwnQuartiles,
}

/// Validated analysis parameters
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Prior candles a candidate must out-size to count as engulfing
    pub lookbehind_candles: Period,
    /// Maximum following candles scanned for price extremes
    pub lookahead_candles: Period,
    /// Bucket width of the probability threshold grid
    #[serde(rename = "groupSizeForPctPriceIncreaseProbability")]
    pub group_size: GroupSize,
    #[serde(default)]
    pub volume_fence: VolumeFence,
}

impl AnalysisConfig {
    /// Validate raw parameters, in order: lookbehind, lookahead, group size.
    pub fn new(lookbehind_candles: usize, lookahead_candles: usize, group_size: f64) -> Result<Self> {
        let lookbehind_candles = Period::new(lookbehind_candles)
            .map_err(|_| AnalysisError::InvalidValue(LOOKBEHIND_ERROR))?;
        let lookahead_candles = Period::new(lookahead_candles)
            .map_err(|_| AnalysisError::InvalidValue(LOOKAHEAD_ERROR))?;
        let group_size =
            GroupSize::new(group_size).map_err(|_| AnalysisError::InvalidValue(GROUP_SIZE_ERROR))?;

        Ok(Self {
            lookbehind_candles,
            lookahead_candles,
            group_size,
            volume_fence: VolumeFence::default(),
        })
    }

    pub fn with_volume_fence(mut self, volume_fence: VolumeFence) -> Self {
        self.volume_fence = volume_fence;
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookbehind_candles: Period::new_const(DEFAULT_LOOKBEHIND_CANDLES),
            lookahead_candles: Period::new_const(DEFAULT_LOOKAHEAD_CANDLES),
            group_size: GroupSize::new_const(DEFAULT_GROUP_SIZE),
            volume_fence: VolumeFence::Compatible,
        }
    }
}

// ============================================================
// ANALYZER
// ============================================================

use stages::{build_probabilities, extract_events, filter_outliers, AnalysisReport};

/// Runs the extract -> filter -> probability -> report pipeline
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    validate_data: bool,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            validate_data: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Unfiltered events, one per candle from index `lookbehind_candles` on.
    pub fn extract<T: OHLCV>(&self, candles: &[T]) -> Vec<Event> {
        extract_events(
            candles,
            self.config.lookbehind_candles,
            self.config.lookahead_candles,
        )
    }

    /// Run the full pipeline over time-sorted candles.
    pub fn analyze<T: OHLCV>(&self, candles: &[T]) -> Result<AnalysisReport> {
        let span = tracing::debug_span!(
            "analyze",
            candles = candles.len(),
            lookbehind = self.config.lookbehind_candles.get(),
            lookahead = self.config.lookahead_candles.get(),
        );
        let _guard = span.enter();

        if self.validate_data {
            validate_candles(candles)?;
        }

        let events = self.extract(candles);
        tracing::debug!(events = events.len(), "extracted events");

        let events = filter_outliers(events, self.config.volume_fence)?;
        tracing::debug!(filtered = events.len(), "filtered outliers");

        let curves = build_probabilities(&events, self.config.group_size);
        tracing::debug!(
            thresholds = curves.probabilities.len(),
            "built probability curves"
        );

        Ok(AnalysisReport::assemble(events, &self.config, curves))
    }
}

fn validate_candles<T: OHLCV>(candles: &[T]) -> Result<()> {
    for (i, candle) in candles.iter().enumerate() {
        candle.validate().map_err(|e| match e {
            AnalysisError::InvalidCandle { reason, .. } => {
                AnalysisError::InvalidCandle { index: i, reason }
            }
            other => other,
        })?;
        if i > 0 && candle.time() < candles[i - 1].time() {
            return Err(AnalysisError::UnsortedCandles { index: i });
        }
    }
    Ok(())
}

/// Analyze `candles` with `config`.
pub fn analyze<T: OHLCV>(candles: &[T], config: &AnalysisConfig) -> Result<AnalysisReport> {
    Analyzer::new(*config).analyze(candles)
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating Analyzer instances
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    lookbehind_candles: Option<usize>,
    lookahead_candles: Option<usize>,
    group_size: Option<f64>,
    volume_fence: VolumeFence,
    validate_data: bool,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.lookbehind_candles = Some(config.lookbehind_candles.get());
        self.lookahead_candles = Some(config.lookahead_candles.get());
        self.group_size = Some(config.group_size.get());
        self.volume_fence = config.volume_fence;
        self
    }

    pub fn lookbehind_candles(mut self, n: usize) -> Self {
        self.lookbehind_candles = Some(n);
        self
    }

    pub fn lookahead_candles(mut self, n: usize) -> Self {
        self.lookahead_candles = Some(n);
        self
    }

    pub fn group_size(mut self, size: f64) -> Self {
        self.group_size = Some(size);
        self
    }

    pub fn volume_fence(mut self, fence: VolumeFence) -> Self {
        self.volume_fence = fence;
        self
    }

    /// Enable/disable candle validation (finite values, high >= low, sorted times)
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.validate_data = enable;
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        let lookbehind = self
            .lookbehind_candles
            .ok_or(AnalysisError::InvalidValue(LOOKBEHIND_ERROR))?;
        let lookahead = self
            .lookahead_candles
            .ok_or(AnalysisError::InvalidValue(LOOKAHEAD_ERROR))?;
        let group_size = self
            .group_size
            .ok_or(AnalysisError::InvalidValue(GROUP_SIZE_ERROR))?;

        let config = AnalysisConfig::new(lookbehind, lookahead, group_size)?
            .with_volume_fence(self.volume_fence);

        Ok(Analyzer {
            config,
            validate_data: self.validate_data,
        })
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Report for a single instrument
#[derive(Debug)]
pub struct InstrumentReport {
    pub symbol: String,
    pub report: AnalysisReport,
}

/// Error from analyzing a single instrument
#[derive(Debug)]
pub struct InstrumentError {
    pub symbol: String,
    pub error: AnalysisError,
}

/// Parallel analysis of multiple instruments
pub fn analyze_parallel<'a, T, I>(
    analyzer: &Analyzer,
    instruments: I,
) -> (Vec<InstrumentReport>, Vec<InstrumentError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, candles)| {
            analyzer
                .analyze(candles)
                .map(|report| InstrumentReport {
                    symbol: symbol.to_string(),
                    report,
                })
                .map_err(|error| InstrumentError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_flat_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64 * 60, 100.0, 101.0, 99.0, 100.5, 1000.0))
            .collect()
    }

    fn make_wavy_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + ((i * 7) % 11) as f64;
                let body = ((i * 3) % 5) as f64 - 2.0;
                let volume = 1000.0 + ((i * 13) % 17) as f64 * 50.0;
                Candle::new(
                    i as i64 * 3600,
                    base,
                    base.max(base + body) + 1.0,
                    base.min(base + body) - 1.0,
                    base + body,
                    volume,
                )
            })
            .collect()
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_group_size_validation() {
        assert!(GroupSize::new(0.01).is_ok());
        assert!(GroupSize::new(0.0).is_err());
        assert!(GroupSize::new(-0.5).is_err());
        assert!(GroupSize::new(f64::NAN).is_err());
        assert!(GroupSize::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_config_error_messages() {
        let err = AnalysisConfig::new(0, 5, 0.01).unwrap_err();
        assert_eq!(err.to_string(), LOOKBEHIND_ERROR);

        let err = AnalysisConfig::new(3, 0, 0.01).unwrap_err();
        assert_eq!(err.to_string(), LOOKAHEAD_ERROR);

        let err = AnalysisConfig::new(3, 5, 0.0).unwrap_err();
        assert_eq!(err.to_string(), GROUP_SIZE_ERROR);

        // lookbehind is checked first
        let err = AnalysisConfig::new(0, 0, -1.0).unwrap_err();
        assert_eq!(err.to_string(), LOOKBEHIND_ERROR);
    }

    #[test]
    fn test_builder_missing_params() {
        let err = AnalyzerBuilder::new()
            .lookahead_candles(3)
            .group_size(0.01)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), LOOKBEHIND_ERROR);

        let err = AnalyzerBuilder::new()
            .lookbehind_candles(3)
            .lookahead_candles(3)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), GROUP_SIZE_ERROR);
    }

    #[test]
    fn test_builder_from_config() {
        let config = AnalysisConfig::new(4, 6, 0.02)
            .unwrap()
            .with_volume_fence(VolumeFence::OwnQuartiles);
        let analyzer = AnalyzerBuilder::new().config(config).build().unwrap();
        assert_eq!(*analyzer.config(), config);
    }

    #[test]
    fn test_ohlcv_ext() {
        let candle = Candle::new(0, 100.0, 110.0, 90.0, 105.0, 10.0);
        assert_eq!(candle.signed_body(), 5.0);
        assert_eq!(candle.body(), 5.0);
        assert!(candle.is_bullish());

        let bearish = Candle::new(0, 105.0, 110.0, 90.0, 100.0, 10.0);
        assert_eq!(bearish.signed_body(), -5.0);
        assert_eq!(bearish.body(), 5.0);
        assert!(!bearish.is_bullish());
        assert_eq!(bearish.range(), 20.0);
    }

    #[test]
    fn test_dyn_ohlcv_input() {
        let candles = make_wavy_candles(30);
        let dyn_candles: Vec<&dyn OHLCV> = candles.iter().map(|c| c as &dyn OHLCV).collect();

        let analyzer = Analyzer::new(AnalysisConfig::new(3, 4, 0.01).unwrap());
        assert_eq!(analyzer.extract(&dyn_candles), analyzer.extract(&candles));
    }

    #[test]
    fn test_empty_analysis() {
        let analyzer = Analyzer::new(AnalysisConfig::new(2, 2, 0.01).unwrap());
        let report = analyzer.analyze::<Candle>(&[]).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(report.bullish_engulfing_event_count, 0);
        assert!(report.probabilities.is_empty());
        assert!(report.control_probabilities.is_empty());
    }

    #[test]
    fn test_too_short_analysis() {
        let analyzer = Analyzer::new(AnalysisConfig::new(5, 2, 0.01).unwrap());
        let report = analyzer.analyze(&make_flat_candles(5)).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(report.lookbehind_candles.get(), 5);
        assert_eq!(report.lookahead_candles.get(), 2);
    }

    #[test]
    fn test_extract_count() {
        let analyzer = Analyzer::new(AnalysisConfig::new(3, 2, 0.01).unwrap());
        let events = analyzer.extract(&make_flat_candles(10));
        assert_eq!(events.len(), 7);
        assert_eq!(events[0].candle_index, 3);
        assert_eq!(events[6].candle_index, 9);
    }

    #[test]
    fn test_validate_data_rejects_bad_candle() {
        let mut candles = make_flat_candles(6);
        candles[4].high = 50.0;

        let analyzer = AnalyzerBuilder::new()
            .lookbehind_candles(2)
            .lookahead_candles(2)
            .group_size(0.01)
            .validate_data(true)
            .build()
            .unwrap();

        match analyzer.analyze(&candles) {
            Err(AnalysisError::InvalidCandle { index, reason }) => {
                assert_eq!(index, 4);
                assert_eq!(reason, "high < low");
            }
            other => panic!("expected InvalidCandle, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_data_rejects_unsorted() {
        let mut candles = make_flat_candles(6);
        candles.swap(2, 3);

        let analyzer = AnalyzerBuilder::new()
            .lookbehind_candles(2)
            .lookahead_candles(2)
            .group_size(0.01)
            .validate_data(true)
            .build()
            .unwrap();

        assert!(matches!(
            analyzer.analyze(&candles),
            Err(AnalysisError::UnsortedCandles { index: 3 })
        ));
    }

    #[test]
    fn test_validation_off_by_default() {
        let mut candles = make_flat_candles(6);
        candles.swap(2, 3);
        let analyzer = Analyzer::new(AnalysisConfig::new(2, 2, 0.01).unwrap());
        assert!(analyzer.analyze(&candles).is_ok());
    }

    #[test]
    fn test_free_fn_matches_analyzer() {
        let candles = make_wavy_candles(60);
        let config = AnalysisConfig::new(3, 4, 0.005).unwrap();
        let a = analyze(&candles, &config).unwrap();
        let b = Analyzer::new(config).analyze(&candles).unwrap();
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn test_parallel_analysis() {
        let analyzer = Analyzer::new(AnalysisConfig::new(3, 4, 0.01).unwrap());

        let candles1 = make_wavy_candles(80);
        let candles2 = make_flat_candles(40);

        let instruments: Vec<(&str, &[Candle])> =
            vec![("BTCUSD", &candles1), ("ETHUSD", &candles2)];

        let (results, errors) = analyze_parallel(&analyzer, instruments);
        assert_eq!(results.len(), 2);
        assert!(errors.is_empty());

        let btc = results.iter().find(|r| r.symbol == "BTCUSD").unwrap();
        let serial = analyzer.analyze(&candles1).unwrap();
        assert_eq!(format!("{:?}", btc.report), format!("{serial:?}"));
    }

    #[test]
    fn test_parallel_analysis_collects_errors() {
        let analyzer = AnalyzerBuilder::new()
            .lookbehind_candles(2)
            .lookahead_candles(2)
            .group_size(0.01)
            .validate_data(true)
            .build()
            .unwrap();

        let good = make_flat_candles(10);
        let mut bad = make_flat_candles(10);
        bad[1].close = f64::NAN;

        let instruments: Vec<(&str, &[Candle])> = vec![("GOOD", &good), ("BAD", &bad)];
        let (results, errors) = analyze_parallel(&analyzer, instruments);
        assert_eq!(results.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].symbol, "BAD");
    }

    #[test]
    fn test_config_deserialize() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"lookbehindCandles":3,"lookaheadCandles":12,"groupSizeForPctPriceIncreaseProbability":0.02}"#,
        )
        .unwrap();
        assert_eq!(config.lookbehind_candles.get(), 3);
        assert_eq!(config.lookahead_candles.get(), 12);
        assert_eq!(config.group_size.get(), 0.02);
        assert_eq!(config.volume_fence, VolumeFence::Compatible);

        let bad = serde_json::from_str::<AnalysisConfig>(
            r#"{"lookbehindCandles":0,"lookaheadCandles":12,"groupSizeForPctPriceIncreaseProbability":0.02}"#,
        );
        assert!(bad.is_err());

        let fence: AnalysisConfig = serde_json::from_str(
            r#"{"lookbehindCandles":3,"lookaheadCandles":12,"groupSizeForPctPriceIncreaseProbability":0.02,"volumeFence":"ownQuartiles"}"#,
        )
        .unwrap();
        assert_eq!(fence.volume_fence, VolumeFence::OwnQuartiles);
    }
}
