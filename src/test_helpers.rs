use chrono::{DateTime, Utc};

use crate::models::{
    Basis, EntryLadder, InstrumentDraft, InstrumentMeta, ProfitState, TransactionDraft,
    TransactionRecord, UserDraft, UserRole,
};

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-21T14:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Rebar-like contract: tick value resolves to 20.
pub fn sample_meta() -> InstrumentMeta {
    InstrumentMeta {
        name: "Rebar".to_string(),
        min_price_tick: 1.0,
        contract_size: 20.0,
        commission: 3.0,
        tick_value: 0.0,
    }
}

pub fn sample_instrument_draft() -> InstrumentDraft {
    InstrumentDraft {
        code: "rb2410".to_string(),
        name: "Rebar".to_string(),
        exchange: "SHFE".to_string(),
        min_price_tick: 1.0,
        fee: 3.0,
        contract_size: 20.0,
        unit: "ton".to_string(),
    }
}

pub fn sample_user_draft() -> UserDraft {
    UserDraft {
        email: "trader@example.com".to_string(),
        username: "trader".to_string(),
        role: UserRole::User,
    }
}

/// Draft with the form defaults and a long ladder based at 200 — the inputs
/// behind the known calculation scenarios.
pub fn sample_draft() -> TransactionDraft {
    TransactionDraft {
        instrument_id: "1".to_string(),
        meta: sample_meta(),
        description: None,
        basis: Basis::default(),
        entry: EntryLadder {
            base_entry_price: 200.0,
            ..EntryLadder::default()
        },
        profit: ProfitState::default(),
    }
}

pub fn sample_record() -> TransactionRecord {
    TransactionRecord::from_draft("1".to_string(), sample_draft(), fixed_time())
}
