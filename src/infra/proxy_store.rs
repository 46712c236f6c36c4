use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{InsertOutcome, MarkUsed, ProxyStore},
    domain::entities::proxy_record::ProxyRecord,
};

/// Proxy records as JSON strings under `unsub_proxy:{id}`.
///
/// Keys carry an absolute expiry (`EXAT expires_at`), so Redis drops expired
/// records on its own and `sweep_expired` has nothing to do.
#[derive(Clone)]
pub struct RedisProxyStore {
    manager: ConnectionManager,
}

impl RedisProxyStore {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    fn key(proxy_id: &str) -> String {
        format!("unsub_proxy:{proxy_id}")
    }
}

fn unavailable(context: &str, e: impl std::fmt::Display) -> AppError {
    AppError::StoreUnavailable(format!("{context}: {e}"))
}

fn parse_record(value: &str) -> AppResult<ProxyRecord> {
    serde_json::from_str(value)
        .map_err(|e| AppError::Internal(format!("Failed to parse proxy record: {e}")))
}

#[async_trait]
impl ProxyStore for RedisProxyStore {
    async fn insert(&self, record: &ProxyRecord) -> AppResult<InsertOutcome> {
        let mut conn = self.manager.clone();
        let json = serde_json::to_string(record)
            .map_err(|e| AppError::Internal(format!("Failed to serialize proxy record: {e}")))?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(&record.proxy_id))
            .arg(json)
            .arg("NX")
            .arg("EXAT")
            .arg(record.expires_at)
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable("Failed to insert proxy record", e))?;

        Ok(match reply {
            Some(_) => InsertOutcome::Stored,
            None => InsertOutcome::IdTaken,
        })
    }

    async fn get(&self, proxy_id: &str) -> AppResult<Option<ProxyRecord>> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = conn
            .get(Self::key(proxy_id))
            .await
            .map_err(|e| unavailable("Failed to read proxy record", e))?;

        raw.as_deref().map(parse_record).transpose()
    }

    async fn mark_used(&self, proxy_id: &str, now: i64) -> AppResult<MarkUsed> {
        let mut conn = self.manager.clone();

        // Read, check and write in one script so two clicks cannot both
        // transition the record. KEEPTTL preserves the EXAT expiry.
        let script = redis::Script::new(
            r#"
            local value = redis.call('GET', KEYS[1])
            if not value then
                return {0, ''}
            end

            local data = cjson.decode(value)
            if data.used_at then
                return {2, value}
            end

            data.used_at = tonumber(ARGV[1])
            local updated = cjson.encode(data)
            redis.call('SET', KEYS[1], updated, 'KEEPTTL')
            return {1, updated}
            "#,
        );

        let (status, value): (i64, String) = script
            .key(Self::key(proxy_id))
            .arg(now)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| unavailable("Failed to mark proxy record used", e))?;

        match status {
            1 => Ok(MarkUsed::Transitioned(parse_record(&value)?)),
            2 => Ok(MarkUsed::AlreadyUsed(parse_record(&value)?)),
            _ => Ok(MarkUsed::NotFound),
        }
    }

    async fn delete(&self, proxy_id: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn
            .del(Self::key(proxy_id))
            .await
            .map_err(|e| unavailable("Failed to delete proxy record", e))?;
        Ok(())
    }

    async fn sweep_expired(&self, _now: i64) -> AppResult<u64> {
        Ok(0)
    }
}
