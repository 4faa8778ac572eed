pub mod basis;
pub mod entry;
pub mod meta;
pub mod pipeline;
pub mod profit;

pub use pipeline::{recompute, Stage, StageWarning};
pub use profit::ProfitContext;

use thiserror::Error;

/// Canonical number of fractional digits for derived values.
pub const DEFAULT_PRECISION: u32 = 6;

/// Why a calculator stage declined to run. A skip leaves the record
/// untouched; it is a warning for the caller, never a failure.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SkipReason {
    #[error("margin must be greater than 0 (got {margin})")]
    NonPositiveMargin { margin: f64 },
    #[error("tick value must be greater than 0 (got {tick_value})")]
    NonPositiveTickValue { tick_value: f64 },
    #[error("max tradable lots must be greater than 0 (got {lots})")]
    NonPositiveLots { lots: f64 },
}

pub fn round_dp(x: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (x * factor).round() / factor
}

pub fn round6(x: f64) -> f64 {
    round_dp(x, DEFAULT_PRECISION)
}
