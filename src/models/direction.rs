use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

/// One of the three staggered sub-orders around the base entry price.
/// The wire keeps the legacy `m1`/`m2`/`m3` labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RungSlot {
    #[serde(rename = "m1")]
    Near,
    #[serde(rename = "m2")]
    Mid,
    #[serde(rename = "m3")]
    Far,
}

impl RungSlot {
    pub const ALL: [RungSlot; 3] = [RungSlot::Near, RungSlot::Mid, RungSlot::Far];

    pub fn as_str(&self) -> &'static str {
        match self {
            RungSlot::Near => "near",
            RungSlot::Mid => "mid",
            RungSlot::Far => "far",
        }
    }
}

impl fmt::Display for RungSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How the position summary attributes floating profit: a single rung, or
/// the sum of all three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfitAttribution {
    #[default]
    #[serde(rename = "m1")]
    Near,
    #[serde(rename = "m2")]
    Mid,
    #[serde(rename = "m3")]
    Far,
    #[serde(rename = "sum")]
    Sum,
}

impl ProfitAttribution {
    pub fn rung(self) -> Option<RungSlot> {
        match self {
            ProfitAttribution::Near => Some(RungSlot::Near),
            ProfitAttribution::Mid => Some(RungSlot::Mid),
            ProfitAttribution::Far => Some(RungSlot::Far),
            ProfitAttribution::Sum => None,
        }
    }
}

impl fmt::Display for ProfitAttribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitAttribution::Near => write!(f, "near"),
            ProfitAttribution::Mid => write!(f, "mid"),
            ProfitAttribution::Far => write!(f, "far"),
            ProfitAttribution::Sum => write!(f, "sum"),
        }
    }
}
