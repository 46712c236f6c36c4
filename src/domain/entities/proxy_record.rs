use serde::{Deserialize, Serialize};
use unsubscribe_codec::{ProxyCell, ProxyCellStatus, UnsubscribeClaims};

use super::action_state::{ActionEvent, ActionState};

/// Out-of-band record behind a proxy id. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRecord {
    pub proxy_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
    // Omitted rather than null so the Redis Lua script sees a nil field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<i64>,
}

impl ProxyRecord {
    pub fn is_valid(&self, now: i64) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }

    pub fn state(&self, now: i64) -> ActionState {
        let state = ActionState::Issued.apply(ActionEvent::Constructed);
        let state = match self.used_at {
            Some(_) => state.apply(ActionEvent::MarkUsed),
            None => state,
        };
        state.at(self.expires_at, now)
    }

    /// Sets `used_at` once. Returns false when the record was already used.
    pub fn mark_used(&mut self, now: i64) -> bool {
        if self.used_at.is_some() {
            return false;
        }
        self.used_at = Some(now);
        true
    }

    pub fn to_claims(&self) -> UnsubscribeClaims {
        UnsubscribeClaims {
            email: self.email.clone(),
            token_type: unsubscribe_codec::CLAIM_TYPE.to_string(),
            campaign_id: self.campaign_id.clone(),
            issued_at: self.created_at,
            expires_at: self.expires_at,
        }
    }

    pub fn to_cell(&self) -> ProxyCell {
        ProxyCell {
            status: if self.used_at.is_some() {
                ProxyCellStatus::Used
            } else {
                ProxyCellStatus::Active
            },
            proxy_id: self.proxy_id.clone(),
            expires_at: self.expires_at,
            used_at: self.used_at,
        }
    }

    /// Rebuilds a record from a cell and the row it was found in. The cell
    /// does not carry a creation time, so it is derived from the fixed ttl.
    pub fn from_cell(cell: ProxyCell, email: String, ttl_secs: i64) -> Self {
        Self {
            proxy_id: cell.proxy_id,
            email,
            campaign_id: None,
            created_at: cell.expires_at - ttl_secs,
            expires_at: cell.expires_at,
            used_at: cell.used_at,
        }
    }
}
