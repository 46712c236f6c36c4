use async_trait::async_trait;

use crate::app_error::AppResult;

/// The mailing-list side: addresses that must not be mailed again.
#[async_trait]
pub trait SuppressionList: Send + Sync {
    /// Returns true when the address was newly added.
    async fn add(&self, email: &str, campaign_id: Option<&str>) -> AppResult<bool>;
}
