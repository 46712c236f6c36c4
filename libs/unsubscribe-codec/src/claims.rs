use serde::{Deserialize, Serialize};

/// Value of the `type` claim on every unsubscribe token.
pub const CLAIM_TYPE: &str = "unsubscribe";

/// The fact an unsubscribe token attests to.
///
/// Timestamps are unix seconds. `email` is expected to be normalized with
/// [`crate::normalize_email`] before the claims are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeClaims {
    pub email: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(
        rename = "campaignId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub campaign_id: Option<String>,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl UnsubscribeClaims {
    /// Builds claims valid from `now` for `ttl_secs` seconds.
    pub fn new(email: String, campaign_id: Option<String>, now: i64, ttl_secs: i64) -> Self {
        Self {
            email,
            token_type: CLAIM_TYPE.to_string(),
            campaign_id,
            issued_at: now,
            expires_at: now + ttl_secs.max(1),
        }
    }

    pub fn has_unsubscribe_type(&self) -> bool {
        self.token_type == CLAIM_TYPE
    }

    /// True while `now` is strictly before `expires_at`.
    pub fn is_live(&self, now: i64) -> bool {
        self.expires_at > now
    }
}
