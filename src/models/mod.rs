pub mod direction;
pub mod instrument;
pub mod transaction;
pub mod user;

pub use direction::{Direction, ProfitAttribution, RungSlot};
pub use instrument::{Instrument, InstrumentDraft, InstrumentMeta};
pub use user::{User, UserDraft, UserRole};
pub use transaction::{
    Basis, BasisDerived, EntryLadder, EntryRung, ProfitDerived, ProfitState, RungDerived,
    TransactionDraft, TransactionRecord, MAX_DESCRIPTION_CHARS,
};

use thiserror::Error;

/// Field-level constraint violations, mirroring the input-schema layer that
/// fronts every form in the surrounding application.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than 0 (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be within (0, 100] (got {value})")]
    OutOfPercentRange { field: &'static str, value: f64 },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must be a valid email address")]
    InvalidEmail { field: &'static str },
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { field, value })
    }
}

pub(crate) fn require_percent(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 && value <= 100.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfPercentRange { field, value })
    }
}

pub(crate) fn require_min_chars(
    field: &'static str,
    value: &str,
    min: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        Err(ValidationError::TooShort { field, min })
    } else {
        Ok(())
    }
}

pub(crate) fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail { field }),
    }
}

pub(crate) fn require_max_chars(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty { field })
    } else if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}
