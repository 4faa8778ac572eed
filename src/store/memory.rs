use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::core;
use crate::models::{
    require_max_chars, Instrument, InstrumentDraft, TransactionDraft, TransactionRecord, User,
    UserDraft, MAX_DESCRIPTION_CHARS,
};

use super::{
    InstrumentFilter, InstrumentStore, Page, PageRequest, StoreError, TransactionStore, UserStore,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    transactions: BTreeMap<u64, TransactionRecord>,
    instruments: BTreeMap<u64, Instrument>,
    users: BTreeMap<u64, User>,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store keyed by monotonically increasing ids. Insertion order
/// is creation order, which is also the listing order.
pub struct MemoryStore {
    precision: u32,
    default_page_size: u32,
    max_page_size: u32,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new(cfg: &Config) -> Self {
        MemoryStore {
            precision: cfg.precision,
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            inner: RwLock::new(Inner::default()),
        }
    }

    fn normalize(&self, page: PageRequest) -> PageRequest {
        page.or_default_size(self.default_page_size)
            .clamped(self.max_page_size)
    }
}

fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len();
    let start = ((page.page - 1) as usize) * page.page_size as usize;
    let list = items
        .into_iter()
        .skip(start)
        .take(page.page_size as usize)
        .collect();
    Page {
        list,
        page: page.page,
        page_size: page.page_size,
        total,
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn create(&self, draft: TransactionDraft) -> Result<TransactionRecord, StoreError> {
        draft.validate()?;

        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let mut record = TransactionRecord::from_draft(id.to_string(), draft, Utc::now());
        // Derived values are server-side state, never trusted from the
        // client; skips have already been logged by the stages.
        core::recompute(&mut record, self.precision);

        debug!(id, "created transaction record");
        inner.transactions.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<TransactionRecord, StoreError> {
        let inner = self.inner.read().await;
        parse_id(id)
            .and_then(|key| inner.transactions.get(&key).cloned())
            .ok_or_else(|| StoreError::TransactionNotFound(id.to_string()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<TransactionRecord>, StoreError> {
        let page = self.normalize(page);
        let inner = self.inner.read().await;
        let items: Vec<TransactionRecord> = inner.transactions.values().cloned().collect();
        Ok(paginate(items, page))
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.transactions.values().cloned().collect())
    }

    async fn update_description(
        &self,
        id: &str,
        description: Option<String>,
    ) -> Result<TransactionRecord, StoreError> {
        if let Some(text) = &description {
            require_max_chars("description", text, MAX_DESCRIPTION_CHARS)?;
        }

        let mut inner = self.inner.write().await;
        let key =
            parse_id(id).ok_or_else(|| StoreError::TransactionNotFound(id.to_string()))?;
        let record = inner
            .transactions
            .get_mut(&key)
            .ok_or_else(|| StoreError::TransactionNotFound(id.to_string()))?;

        record.description = description;
        record.updated_at = Utc::now();
        debug!(id, "updated transaction record description");
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let key =
            parse_id(id).ok_or_else(|| StoreError::TransactionNotFound(id.to_string()))?;
        inner
            .transactions
            .remove(&key)
            .ok_or_else(|| StoreError::TransactionNotFound(id.to_string()))?;
        debug!(id, "deleted transaction record");
        Ok(())
    }
}

#[async_trait]
impl InstrumentStore for MemoryStore {
    async fn create(&self, draft: InstrumentDraft) -> Result<Instrument, StoreError> {
        draft.validate()?;

        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let now = Utc::now();
        let instrument = Instrument {
            id: id.to_string(),
            code: draft.code,
            name: draft.name,
            exchange: draft.exchange,
            min_price_tick: draft.min_price_tick,
            fee: draft.fee,
            contract_size: draft.contract_size,
            unit: draft.unit,
            created_at: now,
            updated_at: now,
        };

        debug!(id, code = %instrument.code, "created instrument");
        inner.instruments.insert(id, instrument.clone());
        Ok(instrument)
    }

    async fn get(&self, id: &str) -> Result<Instrument, StoreError> {
        let inner = self.inner.read().await;
        parse_id(id)
            .and_then(|key| inner.instruments.get(&key).cloned())
            .ok_or_else(|| StoreError::InstrumentNotFound(id.to_string()))
    }

    async fn list(
        &self,
        filter: InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError> {
        let page = self.normalize(page);
        let inner = self.inner.read().await;
        let items: Vec<Instrument> = inner
            .instruments
            .values()
            .filter(|i| match &filter.exchange {
                Some(exchange) => &i.exchange == exchange,
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn update(&self, id: &str, draft: InstrumentDraft) -> Result<Instrument, StoreError> {
        draft.validate()?;

        let mut inner = self.inner.write().await;
        let key = parse_id(id).ok_or_else(|| StoreError::InstrumentNotFound(id.to_string()))?;
        let instrument = inner
            .instruments
            .get_mut(&key)
            .ok_or_else(|| StoreError::InstrumentNotFound(id.to_string()))?;

        instrument.code = draft.code;
        instrument.name = draft.name;
        instrument.exchange = draft.exchange;
        instrument.min_price_tick = draft.min_price_tick;
        instrument.fee = draft.fee;
        instrument.contract_size = draft.contract_size;
        instrument.unit = draft.unit;
        instrument.updated_at = Utc::now();
        debug!(id, "updated instrument");
        Ok(instrument.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let key = parse_id(id).ok_or_else(|| StoreError::InstrumentNotFound(id.to_string()))?;
        inner
            .instruments
            .remove(&key)
            .ok_or_else(|| StoreError::InstrumentNotFound(id.to_string()))?;
        debug!(id, "deleted instrument");
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, draft: UserDraft) -> Result<User, StoreError> {
        draft.validate()?;

        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let now = Utc::now();
        let user = User {
            id: id.to_string(),
            email: draft.email,
            username: draft.username,
            role: draft.role,
            created_at: now,
            updated_at: now,
        };

        debug!(id, username = %user.username, "created user");
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: &str) -> Result<User, StoreError> {
        let inner = self.inner.read().await;
        parse_id(id)
            .and_then(|key| inner.users.get(&key).cloned())
            .ok_or_else(|| StoreError::UserNotFound(id.to_string()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, StoreError> {
        let page = self.normalize(page);
        let inner = self.inner.read().await;
        let items: Vec<User> = inner.users.values().cloned().collect();
        Ok(paginate(items, page))
    }

    async fn update(&self, id: &str, draft: UserDraft) -> Result<User, StoreError> {
        draft.validate()?;

        let mut inner = self.inner.write().await;
        let key = parse_id(id).ok_or_else(|| StoreError::UserNotFound(id.to_string()))?;
        let user = inner
            .users
            .get_mut(&key)
            .ok_or_else(|| StoreError::UserNotFound(id.to_string()))?;

        user.email = draft.email;
        user.username = draft.username;
        user.role = draft.role;
        user.updated_at = Utc::now();
        debug!(id, "updated user");
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let key = parse_id(id).ok_or_else(|| StoreError::UserNotFound(id.to_string()))?;
        inner
            .users
            .remove(&key)
            .ok_or_else(|| StoreError::UserNotFound(id.to_string()))?;
        debug!(id, "deleted user");
        Ok(())
    }
}
