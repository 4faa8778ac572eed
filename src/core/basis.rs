use tracing::warn;

use crate::models::{Basis, BasisDerived};

use super::{round_dp, SkipReason};

/// Convert capital, utilization ratio and per-lot margin into the tradable
/// quantity and its risk metrics.
///
/// Skips (record stays as-is) when margin is not positive; the caller gets
/// the reason back instead of an error.
pub fn derive(basis: &Basis, tick_value: f64, precision: u32) -> Result<BasisDerived, SkipReason> {
    if basis.margin <= 0.0 {
        warn!(margin = basis.margin, "basis stage skipped: non-positive margin");
        return Err(SkipReason::NonPositiveMargin {
            margin: basis.margin,
        });
    }

    let max_tradable_lots = round_dp(
        (basis.total_capital * basis.capital_ratio) / (100.0 * basis.margin),
        precision,
    );
    let capital_in_use = round_dp(basis.total_capital * (basis.capital_ratio / 100.0), precision);
    let margin_in_use = round_dp(basis.margin * max_tradable_lots, precision);

    // Ratio over the un-rounded capital figure, as the legacy formula had it.
    let raw_capital_in_use = basis.total_capital * basis.capital_ratio / 100.0;
    let risk_ratio = if raw_capital_in_use == 0.0 {
        None
    } else {
        Some(round_dp(
            basis.margin * max_tradable_lots / raw_capital_in_use,
            precision,
        ))
    };

    let actual_tick_value = round_dp(tick_value * max_tradable_lots, precision);

    Ok(BasisDerived {
        capital_in_use,
        max_tradable_lots,
        margin_in_use,
        risk_ratio,
        actual_tick_value,
    })
}
