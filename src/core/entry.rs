use tracing::warn;

use crate::models::{Direction, EntryLadder, EntryRung, RungDerived};

use super::{round_dp, SkipReason};

/// Derived values for all three rungs, in ladder order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderDerived {
    pub near: RungDerived,
    pub mid: RungDerived,
    pub far: RungDerived,
}

/// Price and size every rung of the ladder, long or short.
///
/// The mid rung anchors to the base entry price exactly; near and far offset
/// from it by their swing in ticks. Skips when the tick value or the lot
/// budget is not positive.
pub fn derive(
    ladder: &EntryLadder,
    tick_value: f64,
    max_tradable_lots: f64,
    precision: u32,
) -> Result<LadderDerived, SkipReason> {
    if tick_value <= 0.0 {
        warn!(tick_value, "entry stage skipped: non-positive tick value");
        return Err(SkipReason::NonPositiveTickValue { tick_value });
    }
    if max_tradable_lots <= 0.0 {
        warn!(
            lots = max_tradable_lots,
            "entry stage skipped: non-positive max tradable lots"
        );
        return Err(SkipReason::NonPositiveLots {
            lots: max_tradable_lots,
        });
    }

    Ok(LadderDerived {
        near: derive_rung(
            &ladder.near,
            ladder.base_entry_price,
            false,
            ladder.direction,
            tick_value,
            max_tradable_lots,
            precision,
        ),
        mid: derive_rung(
            &ladder.mid,
            ladder.base_entry_price,
            true,
            ladder.direction,
            tick_value,
            max_tradable_lots,
            precision,
        ),
        far: derive_rung(
            &ladder.far,
            ladder.base_entry_price,
            false,
            ladder.direction,
            tick_value,
            max_tradable_lots,
            precision,
        ),
    })
}

fn derive_rung(
    rung: &EntryRung,
    base_entry_price: f64,
    anchored: bool,
    direction: Direction,
    tick_value: f64,
    max_tradable_lots: f64,
    precision: u32,
) -> RungDerived {
    let entry_price = if anchored {
        base_entry_price
    } else {
        round_dp(base_entry_price + rung.entry_swing * tick_value, precision)
    };

    let position_size = round_dp(max_tradable_lots * (rung.position_ratio / 100.0), precision);

    let stop_loss_price = round_dp(
        match direction {
            Direction::Short => entry_price - tick_value * rung.stop_loss_swing,
            Direction::Long => entry_price + tick_value * rung.stop_loss_swing,
        },
        precision,
    );

    let breakeven_price = round_dp(
        match direction {
            Direction::Short => entry_price + tick_value * rung.breakeven_swing,
            Direction::Long => entry_price - tick_value * rung.breakeven_swing,
        },
        precision,
    );

    RungDerived {
        entry_price,
        position_size,
        stop_loss_price,
        breakeven_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_PRECISION;

    fn long_ladder(base: f64) -> EntryLadder {
        EntryLadder {
            base_entry_price: base,
            ..EntryLadder::default()
        }
    }

    #[test]
    fn known_long_scenario() {
        let d = derive(&long_ladder(200.0), 20.0, 10.0, DEFAULT_PRECISION).unwrap();
        // near rung: swing 5, ratio 50, stop swing 5, breakeven swing 2
        assert_eq!(d.near.entry_price, 300.0);
        assert_eq!(d.near.position_size, 5.0);
        assert_eq!(d.near.stop_loss_price, 400.0);
        assert_eq!(d.near.breakeven_price, 260.0);
    }

    #[test]
    fn mid_rung_anchors_to_base_price_exactly() {
        let mut ladder = long_ladder(187.3);
        // Even a stray swing on the mid rung must not move it off the base.
        ladder.mid.entry_swing = 9.0;
        let d = derive(&ladder, 20.0, 10.0, DEFAULT_PRECISION).unwrap();
        assert_eq!(d.mid.entry_price, 187.3);
    }

    #[test]
    fn far_rung_offsets_below_base_for_negative_swing() {
        let d = derive(&long_ladder(200.0), 20.0, 10.0, DEFAULT_PRECISION).unwrap();
        assert_eq!(d.far.entry_price, 100.0); // 200 + (-5 × 20)
        assert_eq!(d.far.position_size, 2.0);
    }

    #[test]
    fn short_mirrors_long_around_the_entry() {
        let mut short = long_ladder(200.0);
        short.direction = Direction::Short;
        let l = derive(&long_ladder(200.0), 20.0, 10.0, DEFAULT_PRECISION).unwrap();
        let s = derive(&short, 20.0, 10.0, DEFAULT_PRECISION).unwrap();

        // stop(long) == 2 × entry − stop(short), same for breakeven
        assert_eq!(l.near.stop_loss_price, 2.0 * l.near.entry_price - s.near.stop_loss_price);
        assert_eq!(
            l.near.breakeven_price,
            2.0 * l.near.entry_price - s.near.breakeven_price
        );
    }

    #[test]
    fn short_stop_sits_below_entry() {
        let mut ladder = long_ladder(200.0);
        ladder.direction = Direction::Short;
        let d = derive(&ladder, 20.0, 10.0, DEFAULT_PRECISION).unwrap();
        assert_eq!(d.near.stop_loss_price, 200.0); // 300 − 20 × 5
        assert_eq!(d.near.breakeven_price, 340.0); // 300 + 20 × 2
    }

    #[test]
    fn zero_tick_value_skips() {
        let err = derive(&long_ladder(200.0), 0.0, 10.0, DEFAULT_PRECISION).unwrap_err();
        assert_eq!(err, SkipReason::NonPositiveTickValue { tick_value: 0.0 });
    }

    #[test]
    fn zero_lots_skip() {
        let err = derive(&long_ladder(200.0), 20.0, 0.0, DEFAULT_PRECISION).unwrap_err();
        assert_eq!(err, SkipReason::NonPositiveLots { lots: 0.0 });
    }

    #[test]
    fn fractional_ticks_round_to_precision() {
        let mut ladder = long_ladder(3001.5);
        ladder.near.entry_swing = 3.0;
        let d = derive(&ladder, 0.333333, 7.5, DEFAULT_PRECISION).unwrap();
        assert_eq!(d.near.entry_price, round_dp(3001.5 + 3.0 * 0.333333, 6));
        assert_eq!(d.near.position_size, 3.75);
    }
}
