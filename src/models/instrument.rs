use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_negative, require_positive, require_text, ValidationError};

/// Futures-contract reference data as managed on the instruments screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub code: String,
    pub name: String,
    pub exchange: String,
    pub min_price_tick: f64,
    /// Commission charged per lot.
    pub fee: f64,
    #[serde(rename = "size")]
    pub contract_size: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mutable portion of an [`Instrument`] — what create and update take.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentDraft {
    pub code: String,
    pub name: String,
    pub exchange: String,
    pub min_price_tick: f64,
    pub fee: f64,
    #[serde(rename = "size")]
    pub contract_size: f64,
    pub unit: String,
}

impl InstrumentDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("code", &self.code, 20)?;
        require_text("name", &self.name, 50)?;
        require_text("exchange", &self.exchange, 50)?;
        require_text("unit", &self.unit, 20)?;
        require_positive("minPriceTick", self.min_price_tick)?;
        require_non_negative("fee", self.fee)?;
        require_positive("size", self.contract_size)?;
        Ok(())
    }
}

/// The slice of instrument data a transaction record carries along, plus the
/// derived tick value. Zero tick value means "not yet configured" and makes
/// the downstream calculator stages sit out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentMeta {
    pub name: String,
    pub min_price_tick: f64,
    #[serde(rename = "size")]
    pub contract_size: f64,
    pub commission: f64,
    #[serde(default)]
    pub tick_value: f64,
}
