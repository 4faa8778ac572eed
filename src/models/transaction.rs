use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    require_max_chars, require_non_negative, require_percent, require_positive, Direction,
    InstrumentMeta, ProfitAttribution, RungSlot, ValidationError,
};

/// Longest note the history screen accepts.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Risk-budget inputs: how much capital exists, how much of it may be used,
/// and what one lot costs in margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basis {
    pub total_capital: f64,
    /// Percentage of total capital committed to the trade, in (0, 100].
    pub capital_ratio: f64,
    pub margin: f64,
    #[serde(flatten)]
    pub derived: BasisDerived,
}

impl Default for Basis {
    fn default() -> Self {
        Basis {
            total_capital: 1000.0,
            capital_ratio: 10.0,
            margin: 1.0,
            derived: BasisDerived::default(),
        }
    }
}

impl Basis {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("totalCapital", self.total_capital)?;
        require_percent("capitalRatio", self.capital_ratio)?;
        require_positive("margin", self.margin)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasisDerived {
    pub capital_in_use: f64,
    pub max_tradable_lots: f64,
    pub margin_in_use: f64,
    /// `None` when capital in use is zero and the ratio has no defined
    /// value. The report layer renders that as 0.
    pub risk_ratio: Option<f64>,
    pub actual_tick_value: f64,
}

/// One rung of the entry ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRung {
    /// Signed offset from the base entry price, in ticks. Ignored for the
    /// mid rung, which anchors to the base price exactly.
    pub entry_swing: f64,
    /// Percentage of the max tradable lots allocated to this rung.
    pub position_ratio: f64,
    pub stop_loss_swing: f64,
    pub breakeven_swing: f64,
    #[serde(flatten)]
    pub derived: RungDerived,
}

impl EntryRung {
    pub fn new(
        entry_swing: f64,
        position_ratio: f64,
        stop_loss_swing: f64,
        breakeven_swing: f64,
    ) -> Self {
        EntryRung {
            entry_swing,
            position_ratio,
            stop_loss_swing,
            breakeven_swing,
            derived: RungDerived::default(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_percent("positionRatio", self.position_ratio)?;
        require_non_negative("stopLossSwing", self.stop_loss_swing)?;
        require_non_negative("breakevenSwing", self.breakeven_swing)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RungDerived {
    pub entry_price: f64,
    #[serde(rename = "position")]
    pub position_size: f64,
    pub stop_loss_price: f64,
    pub breakeven_price: f64,
}

/// The staggered-entry configuration: a direction, a base price and three
/// rungs offset around it. Wire labels keep the legacy `m1`/`m2`/`m3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryLadder {
    #[serde(rename = "entryType")]
    pub direction: Direction,
    #[serde(rename = "entryPrice")]
    pub base_entry_price: f64,
    #[serde(rename = "profitType")]
    pub profit_attribution: ProfitAttribution,
    #[serde(rename = "m1")]
    pub near: EntryRung,
    #[serde(rename = "m2")]
    pub mid: EntryRung,
    #[serde(rename = "m3")]
    pub far: EntryRung,
}

impl Default for EntryLadder {
    fn default() -> Self {
        EntryLadder {
            direction: Direction::Long,
            base_entry_price: 0.0,
            profit_attribution: ProfitAttribution::Near,
            near: EntryRung::new(5.0, 50.0, 5.0, 2.0),
            mid: EntryRung::new(0.0, 30.0, 5.0, 2.0),
            far: EntryRung::new(-5.0, 20.0, 5.0, 2.0),
        }
    }
}

impl EntryLadder {
    pub fn rung(&self, slot: RungSlot) -> &EntryRung {
        match slot {
            RungSlot::Near => &self.near,
            RungSlot::Mid => &self.mid,
            RungSlot::Far => &self.far,
        }
    }

    pub fn rung_mut(&mut self, slot: RungSlot) -> &mut EntryRung {
        match slot {
            RungSlot::Near => &mut self.near,
            RungSlot::Mid => &mut self.mid,
            RungSlot::Far => &mut self.far,
        }
    }

    pub fn rungs(&self) -> impl Iterator<Item = (RungSlot, &EntryRung)> + '_ {
        RungSlot::ALL.into_iter().map(move |slot| (slot, self.rung(slot)))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("entryPrice", self.base_entry_price)?;
        for (_, rung) in self.rungs() {
            rung.validate()?;
        }
        Ok(())
    }
}

/// Floating-profit inputs for an open position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitState {
    pub avg_price: f64,
    pub market_price: f64,
    pub exit_lot_price: f64,
    /// Percentage of the max tradable lots to close, in (0, 100].
    pub exit_lot_ratio: f64,
    /// The 20-period moving average the breakeven distance is measured
    /// against.
    pub reference_ema: f64,
    #[serde(flatten)]
    pub derived: ProfitDerived,
}

impl Default for ProfitState {
    fn default() -> Self {
        ProfitState {
            avg_price: 10.0,
            market_price: 5.0,
            exit_lot_price: 5.0,
            exit_lot_ratio: 10.0,
            reference_ema: 5.0,
            derived: ProfitDerived::default(),
        }
    }
}

impl ProfitState {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("avgPrice", self.avg_price)?;
        require_positive("marketPrice", self.market_price)?;
        require_positive("exitLotPrice", self.exit_lot_price)?;
        require_percent("exitLotRatio", self.exit_lot_ratio)?;
        require_positive("referenceEma", self.reference_ema)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitDerived {
    /// Average fill price minus market price.
    pub profit_per_tick: f64,
    pub unrealized_profit: f64,
    /// `None` when margin × lots is zero. Rendered as 0.
    pub unrealized_profit_ratio: Option<f64>,
    pub exit_lot_size: f64,
    pub breakeven_price: f64,
    pub breakeven_ema_delta: f64,
}

/// What the wizard produces and `TransactionStore::create` consumes: a full
/// record minus identity and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub instrument_id: String,
    pub meta: InstrumentMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub basis: Basis,
    pub entry: EntryLadder,
    pub profit: ProfitState,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(description) = &self.description {
            require_max_chars("description", description, MAX_DESCRIPTION_CHARS)?;
        }
        self.basis.validate()?;
        self.entry.validate()?;
        self.profit.validate()?;
        Ok(())
    }
}

/// The persisted aggregate: one completed run of the three-stage tool.
/// Mutated only by editing the description; everything else is replaced
/// wholesale or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub instrument_id: String,
    pub meta: InstrumentMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub basis: Basis,
    pub entry: EntryLadder,
    pub profit: ProfitState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn from_draft(id: String, draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        TransactionRecord {
            id,
            instrument_id: draft.instrument_id,
            meta: draft.meta,
            description: draft.description,
            basis: draft.basis,
            entry: draft.entry,
            profit: draft.profit,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_basis_matches_form_defaults() {
        let b = Basis::default();
        assert_eq!(b.total_capital, 1000.0);
        assert_eq!(b.capital_ratio, 10.0);
        assert_eq!(b.margin, 1.0);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn default_ladder_rung_allocations_sum_to_100() {
        let ladder = EntryLadder::default();
        let total: f64 = ladder.rungs().map(|(_, r)| r.position_ratio).sum();
        assert_eq!(total, 100.0);
        assert_eq!(ladder.mid.entry_swing, 0.0);
    }

    #[test]
    fn capital_ratio_over_100_rejected() {
        let b = Basis {
            capital_ratio: 150.0,
            ..Basis::default()
        };
        assert!(matches!(
            b.validate(),
            Err(ValidationError::OutOfPercentRange {
                field: "capitalRatio",
                ..
            })
        ));
    }

    #[test]
    fn negative_stop_loss_swing_rejected() {
        let mut ladder = EntryLadder {
            base_entry_price: 200.0,
            ..EntryLadder::default()
        };
        ladder.far.stop_loss_swing = -1.0;
        assert!(matches!(
            ladder.validate(),
            Err(ValidationError::Negative {
                field: "stopLossSwing",
                ..
            })
        ));
    }

    #[test]
    fn negative_entry_swing_is_allowed() {
        // Swings below the base price are how the far rung works.
        let ladder = EntryLadder {
            base_entry_price: 200.0,
            ..EntryLadder::default()
        };
        assert_eq!(ladder.far.entry_swing, -5.0);
        assert!(ladder.validate().is_ok());
    }

    #[test]
    fn ladder_wire_uses_legacy_labels() {
        let json = serde_json::to_value(EntryLadder::default()).unwrap();
        assert!(json.get("m1").is_some());
        assert!(json.get("entryType").is_some());
        assert!(json.get("profitType").is_some());
        assert!(json.get("near").is_none());
    }

    #[test]
    fn derived_fields_flatten_into_parent() {
        let json = serde_json::to_value(Basis::default()).unwrap();
        assert!(json.get("maxTradableLots").is_some());
        assert!(json.get("derived").is_none());
    }

    #[test]
    fn over_length_description_rejected() {
        let mut draft = TransactionDraft::default();
        draft.description = Some("x".repeat(MAX_DESCRIPTION_CHARS + 1));
        assert_eq!(
            draft.validate(),
            Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_CHARS,
            })
        );

        draft.description = Some("x".repeat(MAX_DESCRIPTION_CHARS));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_roundtrips_through_json() {
        let draft = TransactionDraft {
            instrument_id: "7".to_string(),
            ..TransactionDraft::default()
        };
        let json = serde_json::to_string(&draft).unwrap();
        let back: TransactionDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(draft, back);
    }

    #[test]
    fn derived_fields_default_when_missing_from_wire() {
        // Older records were stored without display fields; they must still
        // deserialize, with derived halves zeroed.
        let json = r#"{"totalCapital":500.0,"capitalRatio":20.0,"margin":5.0}"#;
        let basis: Basis = serde_json::from_str(json).unwrap();
        assert_eq!(basis.derived, BasisDerived::default());
        assert_eq!(basis.total_capital, 500.0);
    }
}
