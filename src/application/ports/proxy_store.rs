use async_trait::async_trait;

use crate::{app_error::AppResult, domain::entities::proxy_record::ProxyRecord};

/// Result of consuming a proxy record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkUsed {
    /// This call moved the record from unused to used.
    Transitioned(ProxyRecord),
    /// The record was already used; returned unchanged.
    AlreadyUsed(ProxyRecord),
    NotFound,
}

/// Result of storing a new proxy record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Stored,
    /// The id is already taken; draw another.
    IdTaken,
    /// The backend keeps one record per address and that record is still
    /// valid. It was left in place and should be reused.
    Existing(ProxyRecord),
}

/// Durable proxy-id → record mapping with TTL semantics.
///
/// Errors mean the store could not answer, never that the record is invalid.
/// Implementations keep a record readable until `expires_at`; whether it is
/// still valid is the verifier's decision.
#[async_trait]
pub trait ProxyStore: Send + Sync {
    /// Put-if-absent on the id.
    async fn insert(&self, record: &ProxyRecord) -> AppResult<InsertOutcome>;

    /// Read only; never consumes.
    async fn get(&self, proxy_id: &str) -> AppResult<Option<ProxyRecord>>;

    /// Sets `used_at` once, atomically per record where the backend allows it.
    async fn mark_used(&self, proxy_id: &str, now: i64) -> AppResult<MarkUsed>;

    async fn delete(&self, proxy_id: &str) -> AppResult<()>;

    /// Removes records with `expires_at <= now` and nothing else.
    async fn sweep_expired(&self, now: i64) -> AppResult<u64>;
}
