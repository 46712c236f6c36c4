//! In-memory mock implementations of the store ports.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    adapters::sheet::{ContactSheet, SheetRow},
    app_error::{AppError, AppResult},
    application::ports::{InsertOutcome, MarkUsed, ProxyStore, SuppressionList},
    domain::entities::proxy_record::ProxyRecord,
};

/// In-memory implementation of SuppressionList for testing.
#[derive(Default)]
pub struct InMemorySuppressionList {
    pub emails: Mutex<HashSet<String>>,
    pub campaigns: Mutex<Vec<(String, String)>>,
}

impl InMemorySuppressionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, email: &str) -> bool {
        self.emails.lock().unwrap().contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SuppressionList for InMemorySuppressionList {
    async fn add(&self, email: &str, campaign_id: Option<&str>) -> AppResult<bool> {
        if let Some(campaign_id) = campaign_id {
            self.campaigns
                .lock()
                .unwrap()
                .push((campaign_id.to_string(), email.to_string()));
        }
        Ok(self.emails.lock().unwrap().insert(email.to_string()))
    }
}

/// Suppression list whose backend is down.
pub struct FailingSuppressionList;

#[async_trait]
impl SuppressionList for FailingSuppressionList {
    async fn add(&self, _email: &str, _campaign_id: Option<&str>) -> AppResult<bool> {
        Err(AppError::StoreUnavailable("suppression list down".into()))
    }
}

/// Proxy store that errors on every call.
pub struct FailingProxyStore;

#[async_trait]
impl ProxyStore for FailingProxyStore {
    async fn insert(&self, _record: &ProxyRecord) -> AppResult<InsertOutcome> {
        Err(AppError::StoreUnavailable("connection refused".into()))
    }

    async fn get(&self, _proxy_id: &str) -> AppResult<Option<ProxyRecord>> {
        Err(AppError::StoreUnavailable("connection refused".into()))
    }

    async fn mark_used(&self, _proxy_id: &str, _now: i64) -> AppResult<MarkUsed> {
        Err(AppError::StoreUnavailable("connection refused".into()))
    }

    async fn delete(&self, _proxy_id: &str) -> AppResult<()> {
        Err(AppError::StoreUnavailable("connection refused".into()))
    }

    async fn sweep_expired(&self, _now: i64) -> AppResult<u64> {
        Err(AppError::StoreUnavailable("connection refused".into()))
    }
}

/// Proxy store holding a record it cannot decode.
pub struct CorruptRecordProxyStore;

#[async_trait]
impl ProxyStore for CorruptRecordProxyStore {
    async fn insert(&self, _record: &ProxyRecord) -> AppResult<InsertOutcome> {
        Ok(InsertOutcome::Stored)
    }

    async fn get(&self, _proxy_id: &str) -> AppResult<Option<ProxyRecord>> {
        Err(AppError::Internal(
            "Failed to parse proxy record: missing field `email`".into(),
        ))
    }

    async fn mark_used(&self, _proxy_id: &str, _now: i64) -> AppResult<MarkUsed> {
        Ok(MarkUsed::NotFound)
    }

    async fn delete(&self, _proxy_id: &str) -> AppResult<()> {
        Ok(())
    }

    async fn sweep_expired(&self, _now: i64) -> AppResult<u64> {
        Ok(0)
    }
}

/// Proxy store that answers only after `delay`, always with "not found".
pub struct SlowProxyStore {
    delay: Duration,
}

impl SlowProxyStore {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ProxyStore for SlowProxyStore {
    async fn insert(&self, _record: &ProxyRecord) -> AppResult<InsertOutcome> {
        tokio::time::sleep(self.delay).await;
        Ok(InsertOutcome::Stored)
    }

    async fn get(&self, _proxy_id: &str) -> AppResult<Option<ProxyRecord>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn mark_used(&self, _proxy_id: &str, _now: i64) -> AppResult<MarkUsed> {
        tokio::time::sleep(self.delay).await;
        Ok(MarkUsed::NotFound)
    }

    async fn delete(&self, _proxy_id: &str) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn sweep_expired(&self, _now: i64) -> AppResult<u64> {
        tokio::time::sleep(self.delay).await;
        Ok(0)
    }
}

/// In-memory implementation of ContactSheet for testing.
#[derive(Default)]
pub struct InMemoryContactSheet {
    pub rows: Mutex<Vec<SheetRow>>,
}

impl InMemoryContactSheet {
    /// Seed with `(email, location)` pairs; row numbers follow the order.
    pub fn with_rows(rows: &[(&str, &str)]) -> Self {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(row, (email, location))| SheetRow {
                row,
                email: email.to_string(),
                location: location.to_string(),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn location(&self, row: usize) -> String {
        self.rows.lock().unwrap()[row].location.clone()
    }
}

#[async_trait]
impl ContactSheet for InMemoryContactSheet {
    async fn rows(&self) -> AppResult<Vec<SheetRow>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn write_location(&self, row: usize, value: &str) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let target = rows
            .get_mut(row)
            .ok_or_else(|| AppError::InvalidInput(format!("No row {row}")))?;
        target.location = value.to_string();
        Ok(())
    }
}
