//! The three-stage position tool: basis → entry ladder → floating profit.
//!
//! State is an explicit value passed between transitions; every transition
//! is a pure function from one state to the next. Stages unlock strictly
//! forward as the previous stage is submitted, and everything resets once
//! the draft is taken for saving.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::{basis, entry, meta, profit, ProfitContext};
use crate::models::{
    Basis, Direction, EntryLadder, InstrumentMeta, ProfitAttribution, ProfitState,
    TransactionDraft, ValidationError,
};

/// Rejected stage submissions. Locked stages refuse outright; the rest is
/// field validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("{0} stage is locked")]
    StageLocked(WizardStage),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStage {
    Basis,
    Entry,
    Profit,
}

impl WizardStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStage::Basis => "basis",
            WizardStage::Entry => "entry",
            WizardStage::Profit => "profit",
        }
    }
}

impl fmt::Display for WizardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which stages the user may navigate to. Flags only ever move forward
/// until the wizard resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLocks {
    pub basis: bool,
    pub entry: bool,
    pub profit: bool,
}

impl Default for StageLocks {
    fn default() -> Self {
        StageLocks {
            basis: true,
            entry: false,
            profit: false,
        }
    }
}

impl StageLocks {
    pub fn is_unlocked(&self, stage: WizardStage) -> bool {
        match stage {
            WizardStage::Basis => self.basis,
            WizardStage::Entry => self.entry,
            WizardStage::Profit => self.profit,
        }
    }
}

/// The basis form's payload: the selected instrument and the risk budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasisSubmission {
    pub instrument_id: String,
    pub meta: InstrumentMeta,
    pub basis: Basis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub stage: WizardStage,
    pub unlocked: StageLocks,
    pub draft: TransactionDraft,
    /// Set once the profit stage has been submitted; the draft is complete
    /// and may be saved.
    pub ready: bool,
    precision: u32,
}

impl WizardState {
    pub fn new(precision: u32) -> Self {
        WizardState {
            stage: WizardStage::Basis,
            unlocked: StageLocks::default(),
            draft: TransactionDraft::default(),
            ready: false,
            precision,
        }
    }

    /// Navigate to a stage. Locked stages are a no-op, not an error — the
    /// tab simply does not respond.
    pub fn select_stage(&self, stage: WizardStage) -> Self {
        let mut next = self.clone();
        if next.unlocked.is_unlocked(stage) {
            next.stage = stage;
        }
        next
    }

    /// Submit the basis form: validates, resolves the instrument tick value,
    /// runs the risk budget, and unlocks the entry stage.
    pub fn submit_basis(&self, submission: BasisSubmission) -> Result<Self, WizardError> {
        submission.basis.validate()?;

        let mut next = self.clone();
        let resolved = meta::resolve(&submission.meta, self.precision);
        let mut basis = submission.basis;
        // Validation guarantees a positive margin, so the stage cannot skip.
        if let Ok(derived) = basis::derive(&basis, resolved.tick_value, self.precision) {
            basis.derived = derived;
        }

        next.draft.instrument_id = submission.instrument_id;
        next.draft.meta = resolved;
        next.draft.basis = basis;
        next.unlocked.entry = true;
        next.stage = WizardStage::Entry;
        next.ready = false;
        Ok(next)
    }

    pub fn set_direction(&self, direction: Direction) -> Self {
        let mut next = self.clone();
        next.draft.entry.direction = direction;
        next
    }

    pub fn set_profit_attribution(&self, mode: ProfitAttribution) -> Self {
        let mut next = self.clone();
        next.draft.entry.profit_attribution = mode;
        next
    }

    /// Submit the entry form: validates, prices the ladder off the basis
    /// output, and unlocks the profit stage. Refused while the stage is
    /// still locked.
    pub fn submit_entry(&self, ladder: EntryLadder) -> Result<Self, WizardError> {
        if !self.unlocked.entry {
            return Err(WizardError::StageLocked(WizardStage::Entry));
        }
        ladder.validate()?;

        let mut next = self.clone();
        let mut ladder = ladder;
        if let Ok(derived) = entry::derive(
            &ladder,
            next.draft.meta.tick_value,
            next.draft.basis.derived.max_tradable_lots,
            self.precision,
        ) {
            ladder.near.derived = derived.near;
            ladder.mid.derived = derived.mid;
            ladder.far.derived = derived.far;
        }

        next.draft.entry = ladder;
        next.unlocked.profit = true;
        next.stage = WizardStage::Profit;
        next.ready = false;
        Ok(next)
    }

    /// Submit the profit form; the draft is then complete. Refused while
    /// the stage is still locked.
    pub fn submit_profit(&self, profit: ProfitState) -> Result<Self, WizardError> {
        if !self.unlocked.profit {
            return Err(WizardError::StageLocked(WizardStage::Profit));
        }
        profit.validate()?;

        let mut next = self.clone();
        let ctx = ProfitContext {
            tick_value: next.draft.meta.tick_value,
            actual_tick_value: next.draft.basis.derived.actual_tick_value,
            margin: next.draft.basis.margin,
            max_tradable_lots: next.draft.basis.derived.max_tradable_lots,
        };
        let mut profit = profit;
        if let Ok(derived) = profit::derive(&profit, &ctx, self.precision) {
            profit.derived = derived;
        }

        next.draft.profit = profit;
        next.ready = true;
        Ok(next)
    }

    /// Take the completed draft for saving and reset the wizard. `None`
    /// until the profit stage has been submitted.
    pub fn finish(&self) -> Option<(TransactionDraft, Self)> {
        if self.ready {
            Some((self.draft.clone(), self.reset()))
        } else {
            None
        }
    }

    /// Back to the initial stage with everything at defaults — used on
    /// completion and on cancellation alike.
    pub fn reset(&self) -> Self {
        Self::new(self.precision)
    }
}
