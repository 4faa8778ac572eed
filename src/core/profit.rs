use tracing::warn;

use crate::models::{ProfitDerived, ProfitState};

use super::{round_dp, SkipReason};

/// Upstream figures the floating-profit stage reads: instrument tick value
/// plus the basis stage's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitContext {
    pub tick_value: f64,
    pub actual_tick_value: f64,
    pub margin: f64,
    pub max_tradable_lots: f64,
}

/// Mark an open position to market: unrealized profit, profit ratio, the
/// exit quantity, and where breakeven sits relative to the reference moving
/// average. Skips under the same guard as the entry ladder.
pub fn derive(
    profit: &ProfitState,
    ctx: &ProfitContext,
    precision: u32,
) -> Result<ProfitDerived, SkipReason> {
    if ctx.tick_value <= 0.0 {
        warn!(
            tick_value = ctx.tick_value,
            "profit stage skipped: non-positive tick value"
        );
        return Err(SkipReason::NonPositiveTickValue {
            tick_value: ctx.tick_value,
        });
    }
    if ctx.max_tradable_lots <= 0.0 {
        warn!(
            lots = ctx.max_tradable_lots,
            "profit stage skipped: non-positive max tradable lots"
        );
        return Err(SkipReason::NonPositiveLots {
            lots: ctx.max_tradable_lots,
        });
    }

    let profit_per_tick = round_dp(profit.avg_price - profit.market_price, precision);
    let unrealized_profit = round_dp(profit_per_tick * ctx.tick_value, precision);

    let denominator = ctx.margin * ctx.max_tradable_lots;
    let unrealized_profit_ratio = if denominator == 0.0 {
        None
    } else {
        Some(round_dp(
            profit_per_tick * ctx.actual_tick_value / denominator,
            precision,
        ))
    };

    let exit_lot_size = round_dp(
        ctx.max_tradable_lots * (profit.exit_lot_ratio / 100.0),
        precision,
    );
    let breakeven_price = round_dp(2.0 * profit.avg_price - profit.market_price, precision);
    let breakeven_ema_delta = round_dp(breakeven_price - profit.reference_ema, precision);

    Ok(ProfitDerived {
        profit_per_tick,
        unrealized_profit,
        unrealized_profit_ratio,
        exit_lot_size,
        breakeven_price,
        breakeven_ema_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_PRECISION;

    fn ctx() -> ProfitContext {
        ProfitContext {
            tick_value: 20.0,
            actual_tick_value: 200.0,
            margin: 1.0,
            max_tradable_lots: 10.0,
        }
    }

    #[test]
    fn known_scenario() {
        // ProfitState::default() carries the form defaults:
        // avg 10, market 5, exit ratio 10, reference ema 5.
        let d = derive(&ProfitState::default(), &ctx(), DEFAULT_PRECISION).unwrap();
        assert_eq!(d.profit_per_tick, 5.0);
        assert_eq!(d.unrealized_profit, 100.0);
        assert_eq!(d.unrealized_profit_ratio, Some(100.0));
        assert_eq!(d.exit_lot_size, 1.0);
        assert_eq!(d.breakeven_price, 15.0);
        assert_eq!(d.breakeven_ema_delta, 10.0);
    }

    #[test]
    fn underwater_position_goes_negative() {
        let profit = ProfitState {
            avg_price: 5.0,
            market_price: 12.0,
            ..ProfitState::default()
        };
        let d = derive(&profit, &ctx(), DEFAULT_PRECISION).unwrap();
        assert_eq!(d.profit_per_tick, -7.0);
        assert_eq!(d.unrealized_profit, -140.0);
        assert_eq!(d.breakeven_price, -2.0);
    }

    #[test]
    fn zero_margin_leaves_ratio_undefined() {
        let mut c = ctx();
        c.margin = 0.0;
        let d = derive(&ProfitState::default(), &c, DEFAULT_PRECISION).unwrap();
        assert_eq!(d.unrealized_profit_ratio, None);
        // Everything else still computes.
        assert_eq!(d.unrealized_profit, 100.0);
    }

    #[test]
    fn guard_on_tick_value_and_lots() {
        let mut c = ctx();
        c.tick_value = 0.0;
        assert!(derive(&ProfitState::default(), &c, DEFAULT_PRECISION).is_err());

        let mut c = ctx();
        c.max_tradable_lots = -1.0;
        assert_eq!(
            derive(&ProfitState::default(), &c, DEFAULT_PRECISION).unwrap_err(),
            SkipReason::NonPositiveLots { lots: -1.0 }
        );
    }
}
