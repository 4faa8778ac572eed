use std::fmt;

use crate::models::TransactionRecord;

use super::{basis, entry, meta, profit, ProfitContext, SkipReason};

/// Calculator stages that can decline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Basis,
    Entry,
    Profit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Basis => write!(f, "basis"),
            Stage::Entry => write!(f, "entry"),
            Stage::Profit => write!(f, "profit"),
        }
    }
}

/// A stage that sat out during a recompute, and why. The record keeps
/// whatever derived values it already had.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWarning {
    pub stage: Stage,
    pub reason: SkipReason,
}

impl fmt::Display for StageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage skipped: {}", self.stage, self.reason)
    }
}

/// Run the full derived-value pipeline over a record, strictly forward:
/// meta → basis → entry ladder → floating profit. Each stage reads the
/// previous stage's output; skipped stages are reported, not raised.
///
/// Pure with respect to its inputs — recomputing an unchanged record is a
/// bit-identical no-op.
pub fn recompute(record: &mut TransactionRecord, precision: u32) -> Vec<StageWarning> {
    let mut warnings = Vec::new();

    record.meta.tick_value = meta::tick_value(
        record.meta.contract_size,
        record.meta.min_price_tick,
        precision,
    );
    let tick_value = record.meta.tick_value;

    match basis::derive(&record.basis, tick_value, precision) {
        Ok(derived) => record.basis.derived = derived,
        Err(reason) => warnings.push(StageWarning {
            stage: Stage::Basis,
            reason,
        }),
    }

    let max_tradable_lots = record.basis.derived.max_tradable_lots;

    match entry::derive(&record.entry, tick_value, max_tradable_lots, precision) {
        Ok(derived) => {
            record.entry.near.derived = derived.near;
            record.entry.mid.derived = derived.mid;
            record.entry.far.derived = derived.far;
        }
        Err(reason) => warnings.push(StageWarning {
            stage: Stage::Entry,
            reason,
        }),
    }

    let ctx = ProfitContext {
        tick_value,
        actual_tick_value: record.basis.derived.actual_tick_value,
        margin: record.basis.margin,
        max_tradable_lots,
    };
    match profit::derive(&record.profit, &ctx, precision) {
        Ok(derived) => record.profit.derived = derived,
        Err(reason) => warnings.push(StageWarning {
            stage: Stage::Profit,
            reason,
        }),
    }

    warnings
}
