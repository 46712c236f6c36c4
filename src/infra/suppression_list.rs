use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::SuppressionList,
};

const SUPPRESSED_KEY: &str = "unsub_suppressed";

#[derive(Clone)]
pub struct RedisSuppressionList {
    manager: ConnectionManager,
}

impl RedisSuppressionList {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    fn campaign_key(campaign_id: &str) -> String {
        format!("{SUPPRESSED_KEY}:campaign:{campaign_id}")
    }
}

#[async_trait]
impl SuppressionList for RedisSuppressionList {
    async fn add(&self, email: &str, campaign_id: Option<&str>) -> AppResult<bool> {
        let mut conn = self.manager.clone();

        let added: i64 = conn
            .sadd(SUPPRESSED_KEY, email)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to suppress address: {e}")))?;

        // Per-campaign attribution only; the global set is what senders check.
        if let Some(campaign_id) = campaign_id {
            let _: i64 = conn
                .sadd(Self::campaign_key(campaign_id), email)
                .await
                .map_err(|e| {
                    AppError::StoreUnavailable(format!("Failed to record campaign: {e}"))
                })?;
        }

        Ok(added > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_key() {
        assert_eq!(
            RedisSuppressionList::campaign_key("spring-24"),
            "unsub_suppressed:campaign:spring-24"
        );
    }
}
