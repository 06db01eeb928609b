//! Parameter metadata for analysis configuration
//!
//! This module describes the numeric analysis parameters, enabling:
//! - Sweeps over window sizes and bucket widths
//! - Parameter documentation
//! - Building an [`AnalysisConfig`] from loosely typed key/value input
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use engulfing_odds::prelude::*;
//!
//! for param in AnalysisConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let mut params = HashMap::new();
//! params.insert("lookbehindCandles", 4.0);
//! let config = AnalysisConfig::with_params(&params).unwrap();
//! assert_eq!(config.lookbehind_candles.get(), 4);
//!
//! let sweep = config.sweep("lookaheadCandles").unwrap();
//! assert_eq!(sweep.len(), 100);
//! assert!(sweep.iter().all(|c| c.lookbehind_candles.get() == 4));
//! ```

use std::collections::HashMap;

use crate::{
  AnalysisConfig, AnalysisError, GroupSize, Period, Result, DEFAULT_GROUP_SIZE,
  DEFAULT_LOOKAHEAD_CANDLES, DEFAULT_LOOKBEHIND_CANDLES, GROUP_SIZE_ERROR, LOOKAHEAD_ERROR,
  LOOKBEHIND_ERROR,
};

pub const LOOKBEHIND_CANDLES: &str = "lookbehindCandles";
pub const LOOKAHEAD_CANDLES: &str = "lookaheadCandles";
pub const GROUP_SIZE: &str = "groupSizeForPctPriceIncreaseProbability";

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Window length (positive integer)
  Period,
  /// Threshold bucket width (positive number)
  GroupSize,
}

/// Metadata for a single analysis parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name as it appears in serialized configs
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Sweep range: (min, max, step). Values outside it are still valid.
  pub range: (f64, f64, f64),
  pub description: &'static str,
  /// Message reported when a value is rejected
  pub error: &'static str,
}

impl ParamMeta {
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
    error: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description, error }
  }

  pub const fn group_size(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
    error: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::GroupSize, default, range, description, error }
  }

  /// Sweep values `min + k * step` up to `max`, inclusive.
  ///
  /// Each value is computed from its index, so long sweeps do not drift.
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    if !(step > 0.0) || !(max >= min) {
      return vec![min];
    }
    let last = ((max - min) / step + 1e-9).floor() as usize;
    (0..=last).map(|k| min + k as f64 * step).collect()
  }

  /// Check that `value` is legal for this parameter's type.
  pub fn validate(&self, value: f64) -> Result<()> {
    let legal = match self.param_type {
      ParamType::Period => {
        value >= 1.0 && value.fract() == 0.0 && value <= usize::MAX as f64
      },
      ParamType::GroupSize => GroupSize::new(value).is_ok(),
    };
    if legal {
      Ok(())
    } else {
      Err(AnalysisError::InvalidValue(self.error))
    }
  }
}

static PARAMS: [ParamMeta; 3] = [
  ParamMeta::period(
    LOOKBEHIND_CANDLES,
    DEFAULT_LOOKBEHIND_CANDLES as f64,
    (1.0, 50.0, 1.0),
    "Prior candles the current candle must out-size in body and volume",
    LOOKBEHIND_ERROR,
  ),
  ParamMeta::period(
    LOOKAHEAD_CANDLES,
    DEFAULT_LOOKAHEAD_CANDLES as f64,
    (1.0, 100.0, 1.0),
    "Maximum following candles scanned for the high and low",
    LOOKAHEAD_ERROR,
  ),
  ParamMeta::group_size(
    GROUP_SIZE,
    DEFAULT_GROUP_SIZE,
    (0.005, 0.05, 0.005),
    "Width of each percentage bucket on the probability curve",
    GROUP_SIZE_ERROR,
  ),
];

fn find_param(name: &str) -> Result<&'static ParamMeta> {
  PARAMS
    .iter()
    .find(|p| p.name == name)
    .ok_or_else(|| AnalysisError::InvalidConfig(format!("unknown parameter: {name}")))
}

impl AnalysisConfig {
  /// Returns metadata for all numeric parameters
  pub fn param_meta() -> &'static [ParamMeta] {
    &PARAMS
  }

  /// Creates a config from a key/value map.
  ///
  /// Missing parameters use their default values; unknown keys are rejected.
  /// Values are checked in lookbehind, lookahead, group size order.
  pub fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    for key in params.keys() {
      find_param(key)?;
    }

    PARAMS.iter().try_fold(Self::default(), |config, meta| match params.get(meta.name) {
      Some(&value) => config.with_param(meta, value),
      None => Ok(config),
    })
  }

  /// One config per value in `name`'s sweep range, other fields unchanged.
  pub fn sweep(&self, name: &str) -> Result<Vec<Self>> {
    let meta = find_param(name)?;
    meta.generate_grid().into_iter().map(|value| self.with_param(meta, value)).collect()
  }

  fn with_param(mut self, meta: &ParamMeta, value: f64) -> Result<Self> {
    meta.validate(value)?;
    let invalid = |_| AnalysisError::InvalidValue(meta.error);
    match meta.name {
      LOOKBEHIND_CANDLES => self.lookbehind_candles = Period::new(value as usize).map_err(invalid)?,
      LOOKAHEAD_CANDLES => self.lookahead_candles = Period::new(value as usize).map_err(invalid)?,
      _ => self.group_size = GroupSize::new(value).map_err(invalid)?,
    }
    Ok(self)
  }
}

// ============================================================
// TESTS
// ============================================================
