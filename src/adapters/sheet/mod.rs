//! Proxy records kept in a shared contact sheet.
//!
//! Each contact row has a free-text location cell. A proxy record is written
//! into that cell as `unsub|active|<id>|<expiresAt>` and becomes
//! `unsub|used|<id>|<expiresAt>|<usedAt>` once consumed. Cells holding
//! anything else belong to people editing the sheet and are never touched.
//!
//! Sheets offer last-write-wins updates only. `mark_used` reads then writes,
//! so two concurrent clicks on the same link can both see the record unused.
//! Both then suppress the same address, which is harmless, so the race is
//! accepted rather than locked against.

use std::sync::Arc;

use async_trait::async_trait;
use time::Duration;
use tracing::warn;
use unsubscribe_codec::{mark_cell_used, normalize_email, parse_cell};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{InsertOutcome, MarkUsed, ProxyStore},
    domain::entities::proxy_record::ProxyRecord,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub row: usize,
    pub email: String,
    pub location: String,
}

/// Minimal view of a spreadsheet of contacts.
#[async_trait]
pub trait ContactSheet: Send + Sync {
    async fn rows(&self) -> AppResult<Vec<SheetRow>>;
    async fn write_location(&self, row: usize, value: &str) -> AppResult<()>;
}

pub struct CellProxyStore {
    sheet: Arc<dyn ContactSheet>,
    ttl_secs: i64,
}

impl CellProxyStore {
    /// `ttl` must match the issuing ttl; cells do not store a creation time.
    pub fn new(sheet: Arc<dyn ContactSheet>, ttl: Duration) -> Self {
        Self {
            sheet,
            ttl_secs: ttl.whole_seconds(),
        }
    }

    async fn find(&self, proxy_id: &str) -> AppResult<Option<(SheetRow, ProxyRecord)>> {
        let rows = self.sheet.rows().await?;
        Ok(rows.into_iter().find_map(|row| {
            let cell = parse_cell(&row.location)?;
            if cell.proxy_id != proxy_id {
                return None;
            }
            let record = ProxyRecord::from_cell(cell, normalize_email(&row.email), self.ttl_secs);
            Some((row, record))
        }))
    }
}

#[async_trait]
impl ProxyStore for CellProxyStore {
    async fn insert(&self, record: &ProxyRecord) -> AppResult<InsertOutcome> {
        let rows = self.sheet.rows().await?;

        if rows
            .iter()
            .filter_map(|row| parse_cell(&row.location))
            .any(|cell| cell.proxy_id == record.proxy_id)
        {
            return Ok(InsertOutcome::IdTaken);
        }

        let row = rows
            .iter()
            .find(|row| normalize_email(&row.email) == record.email)
            .ok_or_else(|| AppError::InvalidInput("No sheet row for this address".into()))?;

        let location = row.location.trim();
        if !location.is_empty() {
            let Some(cell) = parse_cell(location) else {
                warn!(row = row.row, "Location cell holds other text, not overwriting");
                return Err(AppError::InvalidInput(
                    "Location cell is in use for other data".into(),
                ));
            };
            // One cell per row: a live link already sent must keep working.
            if cell.is_valid(record.created_at) {
                let existing =
                    ProxyRecord::from_cell(cell, normalize_email(&row.email), self.ttl_secs);
                return Ok(InsertOutcome::Existing(existing));
            }
        }

        self.sheet
            .write_location(row.row, &record.to_cell().encode())
            .await?;
        Ok(InsertOutcome::Stored)
    }

    async fn get(&self, proxy_id: &str) -> AppResult<Option<ProxyRecord>> {
        Ok(self.find(proxy_id).await?.map(|(_, record)| record))
    }

    async fn mark_used(&self, proxy_id: &str, now: i64) -> AppResult<MarkUsed> {
        let Some((row, mut record)) = self.find(proxy_id).await? else {
            return Ok(MarkUsed::NotFound);
        };
        if !record.mark_used(now) {
            return Ok(MarkUsed::AlreadyUsed(record));
        }

        let updated = mark_cell_used(&row.location, now)
            .ok_or_else(|| AppError::Internal("Location cell changed while marking".into()))?;
        self.sheet.write_location(row.row, &updated).await?;
        Ok(MarkUsed::Transitioned(record))
    }

    async fn delete(&self, proxy_id: &str) -> AppResult<()> {
        if let Some((row, _)) = self.find(proxy_id).await? {
            self.sheet.write_location(row.row, "").await?;
        }
        Ok(())
    }

    async fn sweep_expired(&self, now: i64) -> AppResult<u64> {
        let mut removed = 0;
        for row in self.sheet.rows().await? {
            let Some(cell) = parse_cell(&row.location) else {
                continue;
            };
            if cell.expires_at <= now {
                self.sheet.write_location(row.row, "").await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
