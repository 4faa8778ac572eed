use crate::models::{Instrument, InstrumentMeta};

use super::round_dp;

/// Monetary value of the smallest allowed price movement for one lot.
/// A zero input yields a zero tick value — the "not yet configured"
/// sentinel the downstream stages guard on, never an error.
pub fn tick_value(contract_size: f64, min_price_tick: f64, precision: u32) -> f64 {
    round_dp(contract_size * min_price_tick, precision)
}

/// Recompute the derived tick value for a meta snapshot.
pub fn resolve(meta: &InstrumentMeta, precision: u32) -> InstrumentMeta {
    InstrumentMeta {
        tick_value: tick_value(meta.contract_size, meta.min_price_tick, precision),
        ..meta.clone()
    }
}

/// Build the meta snapshot a transaction record carries from the selected
/// instrument. The instrument fee becomes the per-lot commission.
pub fn from_instrument(instrument: &Instrument, precision: u32) -> InstrumentMeta {
    InstrumentMeta {
        name: instrument.name.clone(),
        min_price_tick: instrument.min_price_tick,
        contract_size: instrument.contract_size,
        commission: instrument.fee,
        tick_value: tick_value(instrument.contract_size, instrument.min_price_tick, precision),
    }
}
