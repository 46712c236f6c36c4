use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{InsertOutcome, MarkUsed, ProxyStore},
    domain::entities::proxy_record::ProxyRecord,
};

/// Process-local proxy store. Records do not survive a restart.
#[derive(Default)]
pub struct InMemoryProxyStore {
    records: Mutex<HashMap<String, ProxyRecord>>,
}

impl InMemoryProxyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a record, for assertions and diagnostics.
    pub fn snapshot(&self, proxy_id: &str) -> Option<ProxyRecord> {
        self.records.lock().ok()?.get(proxy_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, ProxyRecord>>> {
        self.records
            .lock()
            .map_err(|_| AppError::StoreUnavailable("proxy store lock poisoned".into()))
    }
}

#[async_trait]
impl ProxyStore for InMemoryProxyStore {
    async fn insert(&self, record: &ProxyRecord) -> AppResult<InsertOutcome> {
        let mut records = self.lock()?;
        if records.contains_key(&record.proxy_id) {
            return Ok(InsertOutcome::IdTaken);
        }
        records.insert(record.proxy_id.clone(), record.clone());
        Ok(InsertOutcome::Stored)
    }

    async fn get(&self, proxy_id: &str) -> AppResult<Option<ProxyRecord>> {
        Ok(self.lock()?.get(proxy_id).cloned())
    }

    async fn mark_used(&self, proxy_id: &str, now: i64) -> AppResult<MarkUsed> {
        let mut records = self.lock()?;
        let Some(record) = records.get_mut(proxy_id) else {
            return Ok(MarkUsed::NotFound);
        };
        if record.mark_used(now) {
            Ok(MarkUsed::Transitioned(record.clone()))
        } else {
            Ok(MarkUsed::AlreadyUsed(record.clone()))
        }
    }

    async fn delete(&self, proxy_id: &str) -> AppResult<()> {
        self.lock()?.remove(proxy_id);
        Ok(())
    }

    async fn sweep_expired(&self, now: i64) -> AppResult<u64> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|_, record| record.expires_at > now);
        Ok((before - records.len()) as u64)
    }
}
