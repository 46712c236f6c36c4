use std::sync::Arc;

use tracing::{info, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::SuppressionList,
        use_cases::{
            gateway::GatewayResilience,
            tokens::{TokenUseCases, now_unix},
        },
        validators::email_fingerprint,
    },
};

/// RFC 8058 one-click marker for the `List-Unsubscribe-Post` header.
pub const LIST_UNSUBSCRIBE_POST: &str = "List-Unsubscribe=One-Click";

/// Everything the email composer needs to place an unsubscribe link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribeLink {
    pub token: String,
    pub url: Url,
    /// Value for the `List-Unsubscribe` header: the bare URL in angle brackets.
    pub list_unsubscribe: String,
    pub list_unsubscribe_post: &'static str,
}

pub struct UnsubscribeUseCases {
    gateway: GatewayResilience,
    suppression: Arc<dyn SuppressionList>,
    app_origin: Url,
}

impl UnsubscribeUseCases {
    pub fn new(
        tokens: Arc<TokenUseCases>,
        suppression: Arc<dyn SuppressionList>,
        app_origin: Url,
    ) -> Self {
        Self {
            gateway: GatewayResilience::new(tokens),
            suppression,
            app_origin,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenUseCases> {
        self.gateway.tokens()
    }

    #[instrument(skip_all)]
    pub async fn build_link(
        &self,
        email: &str,
        campaign_id: Option<&str>,
    ) -> AppResult<UnsubscribeLink> {
        let token = self.tokens().issue(email, campaign_id).await?;

        let mut url = self
            .app_origin
            .join("/unsubscribe")
            .map_err(|e| AppError::Internal(format!("Invalid app origin: {e}")))?;
        url.query_pairs_mut().append_pair("token", &token);

        Ok(UnsubscribeLink {
            list_unsubscribe: format!("<{url}>"),
            token,
            url,
            list_unsubscribe_post: LIST_UNSUBSCRIBE_POST,
        })
    }

    pub async fn unsubscribe(&self, presented: &str) -> AppResult<()> {
        self.unsubscribe_at(presented, now_unix()).await
    }

    /// Verifies the presented value and suppresses the address.
    ///
    /// The outcome is the same whether or not the address was already
    /// suppressed. Proxy records are consumed only after the suppression
    /// write succeeded, so a failed write leaves the link usable for a retry.
    #[instrument(skip_all)]
    pub async fn unsubscribe_at(&self, presented: &str, now: i64) -> AppResult<()> {
        let verified = self
            .gateway
            .verify_presented_at(presented, now)
            .await?
            .ok_or(AppError::InvalidToken)?;
        let claims = &verified.claims;

        let newly_added = self
            .suppression
            .add(&claims.email, claims.campaign_id.as_deref())
            .await?;

        self.tokens().consume_at(&verified.token, now).await?;

        info!(
            email_fp = %email_fingerprint(&claims.email),
            campaign_id = ?claims.campaign_id,
            newly_added,
            repaired = verified.repaired,
            "Address unsubscribed"
        );
        Ok(())
    }
}
