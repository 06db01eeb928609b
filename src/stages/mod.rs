//! Analysis pipeline stages
//!
//! Data flows strictly forward, each stage consuming only the output of the
//! one before it:
//!
//! - **extract**: per-candle metrics and the bullish engulfing classification
//! - **filter**: IQR outlier fences over three metric columns
//! - **probability**: threshold grid and the engulfing/control curves
//! - **report**: packaging into [`AnalysisReport`]

pub mod extract;
pub mod filter;
pub mod probability;
pub mod report;

pub use extract::*;
pub use filter::*;
pub use probability::*;
pub use report::*;
