pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Instrument, InstrumentDraft, TransactionDraft, TransactionRecord, User, UserDraft,
    ValidationError,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("transaction record {0} not found")]
    TransactionNotFound(String),
    #[error("instrument {0} not found")]
    InstrumentNotFound(String),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// 1-based page request, defaulting to the first page of ten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: 10,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        PageRequest { page, page_size }
    }

    /// A zero page size means "use the configured default".
    pub fn or_default_size(self, default_page_size: u32) -> Self {
        if self.page_size == 0 {
            PageRequest {
                page_size: default_page_size,
                ..self
            }
        } else {
            self
        }
    }

    /// Normalize out-of-range requests instead of failing them.
    pub fn clamped(self, max_page_size: u32) -> Self {
        PageRequest {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub list: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
}

/// Optional filters for instrument listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentFilter {
    pub exchange: Option<String>,
}

/// CRUD seam for transaction records. The production deployment talks to a
/// remote backend; tests and embedded use run on [`MemoryStore`].
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Validate the draft, run the derived-value pipeline, and persist.
    async fn create(&self, draft: TransactionDraft) -> Result<TransactionRecord, StoreError>;
    async fn get(&self, id: &str) -> Result<TransactionRecord, StoreError>;
    async fn list(&self, page: PageRequest) -> Result<Page<TransactionRecord>, StoreError>;
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError>;
    /// The only field edited after creation.
    async fn update_description(
        &self,
        id: &str,
        description: Option<String>,
    ) -> Result<TransactionRecord, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// CRUD seam for futures-contract reference data.
#[async_trait]
pub trait InstrumentStore: Send + Sync {
    async fn create(&self, draft: InstrumentDraft) -> Result<Instrument, StoreError>;
    async fn get(&self, id: &str) -> Result<Instrument, StoreError>;
    async fn list(
        &self,
        filter: InstrumentFilter,
        page: PageRequest,
    ) -> Result<Page<Instrument>, StoreError>;
    async fn update(&self, id: &str, draft: InstrumentDraft) -> Result<Instrument, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// CRUD seam for dashboard accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, draft: UserDraft) -> Result<User, StoreError>;
    async fn get(&self, id: &str) -> Result<User, StoreError>;
    async fn list(&self, page: PageRequest) -> Result<Page<User>, StoreError>;
    async fn update(&self, id: &str, draft: UserDraft) -> Result<User, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 10);
    }

    #[test]
    fn clamping_normalizes_degenerate_requests() {
        assert_eq!(
            PageRequest::new(0, 0).clamped(100),
            PageRequest::new(1, 1)
        );
        assert_eq!(
            PageRequest::new(3, 500).clamped(100),
            PageRequest::new(3, 100)
        );
    }

    #[test]
    fn zero_page_size_takes_the_configured_default() {
        assert_eq!(
            PageRequest::new(2, 0).or_default_size(25),
            PageRequest::new(2, 25)
        );
        assert_eq!(
            PageRequest::new(2, 5).or_default_size(25),
            PageRequest::new(2, 5)
        );
    }

    #[test]
    fn page_request_deserializes_with_defaults() {
        let req: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, PageRequest::default());
        let req: PageRequest = serde_json::from_str(r#"{"page":2,"pageSize":25}"#).unwrap();
        assert_eq!(req, PageRequest::new(2, 25));
    }
}
