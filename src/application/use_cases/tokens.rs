use std::{future::Future, sync::Arc};

use secrecy::{ExposeSecret, SecretString};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, instrument, warn};
use unsubscribe_codec::{
    CodecError, EncryptionKey, UnsubscribeClaims, decode_signed, decrypt_claims, encode_signed,
    encrypt_claims, generate_proxy_id, is_proxy_id, segment_count,
};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::{InsertOutcome, MarkUsed, ProxyStore},
        validators::{email_fingerprint, normalized_email},
    },
    domain::entities::{proxy_record::ProxyRecord, token_scheme::TokenScheme},
};

const MAX_PROXY_ID_ATTEMPTS: usize = 3;

pub fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// A token scheme together with the material it needs.
pub enum TokenCodec {
    Signed { secret: SecretString },
    Encrypted { key: EncryptionKey },
    Proxy { store: Arc<dyn ProxyStore> },
}

impl TokenCodec {
    /// Picks the codec for `scheme`, failing closed when its key is missing.
    pub fn from_parts(
        scheme: TokenScheme,
        signing_secret: Option<SecretString>,
        encryption_key: Option<EncryptionKey>,
        store: Arc<dyn ProxyStore>,
    ) -> AppResult<Self> {
        match scheme {
            TokenScheme::Signed => match signing_secret {
                Some(secret) if !secret.expose_secret().is_empty() => {
                    Ok(TokenCodec::Signed { secret })
                }
                _ => Err(AppError::MissingSigningKey { scheme }),
            },
            TokenScheme::Encrypted => encryption_key
                .map(|key| TokenCodec::Encrypted { key })
                .ok_or(AppError::MissingSigningKey { scheme }),
            TokenScheme::Proxy => Ok(TokenCodec::Proxy { store }),
        }
    }

    pub fn scheme(&self) -> TokenScheme {
        match self {
            TokenCodec::Signed { .. } => TokenScheme::Signed,
            TokenCodec::Encrypted { .. } => TokenScheme::Encrypted,
            TokenCodec::Proxy { .. } => TokenScheme::Proxy,
        }
    }
}

/// Issues and verifies unsubscribe tokens for one configured scheme.
pub struct TokenUseCases {
    codec: TokenCodec,
    ttl: Duration,
    store_timeout: std::time::Duration,
}

impl TokenUseCases {
    pub fn new(codec: TokenCodec, ttl: Duration, store_timeout: std::time::Duration) -> Self {
        Self {
            codec,
            ttl,
            store_timeout,
        }
    }

    pub fn scheme(&self) -> TokenScheme {
        self.codec.scheme()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn issue(&self, email: &str, campaign_id: Option<&str>) -> AppResult<String> {
        self.issue_at(email, campaign_id, now_unix()).await
    }

    #[instrument(skip_all, fields(scheme = %self.scheme()))]
    pub async fn issue_at(
        &self,
        email: &str,
        campaign_id: Option<&str>,
        now: i64,
    ) -> AppResult<String> {
        let email = normalized_email(email).ok_or(AppError::InvalidEmail)?;
        let campaign_id = campaign_id.map(str::to_owned);
        let ttl_secs = self.ttl.whole_seconds();

        let token = match &self.codec {
            TokenCodec::Signed { secret } => {
                let claims = UnsubscribeClaims::new(email.clone(), campaign_id, now, ttl_secs);
                encode_signed(&claims, secret.expose_secret().as_bytes()).map_err(|e| match e {
                    CodecError::Key(_) => AppError::MissingSigningKey {
                        scheme: TokenScheme::Signed,
                    },
                    other => AppError::Internal(other.to_string()),
                })?
            }
            TokenCodec::Encrypted { key } => {
                let claims = UnsubscribeClaims::new(email.clone(), campaign_id, now, ttl_secs);
                encrypt_claims(&claims, key).map_err(|e| AppError::Internal(e.to_string()))?
            }
            TokenCodec::Proxy { store } => {
                self.issue_proxy(store.as_ref(), &email, campaign_id, now, ttl_secs)
                    .await?
            }
        };

        info!(email_fp = %email_fingerprint(&email), "Issued unsubscribe token");
        Ok(token)
    }

    async fn issue_proxy(
        &self,
        store: &dyn ProxyStore,
        email: &str,
        campaign_id: Option<String>,
        now: i64,
        ttl_secs: i64,
    ) -> AppResult<String> {
        for attempt in 1..=MAX_PROXY_ID_ATTEMPTS {
            let record = ProxyRecord {
                proxy_id: generate_proxy_id(),
                email: email.to_string(),
                campaign_id: campaign_id.clone(),
                created_at: now,
                expires_at: now + ttl_secs.max(1),
                used_at: None,
            };
            match self.bounded(store.insert(&record)).await? {
                InsertOutcome::Stored => return Ok(record.proxy_id),
                InsertOutcome::Existing(existing) => {
                    info!(expires_at = existing.expires_at, "Reusing live proxy record");
                    return Ok(existing.proxy_id);
                }
                InsertOutcome::IdTaken => warn!(attempt, "Proxy id collision, drawing a new id"),
            }
        }
        Err(AppError::Internal(
            "could not allocate a unique proxy id".into(),
        ))
    }

    pub async fn verify(&self, token: &str) -> AppResult<Option<UnsubscribeClaims>> {
        self.verify_at(token, now_unix()).await
    }

    /// Verifies without consuming.
    ///
    /// `Ok(None)` covers every token problem. The only error is
    /// `StoreUnavailable`, raised by the proxy scheme when its store cannot
    /// answer in time.
    #[instrument(skip_all, fields(scheme = %self.scheme()))]
    pub async fn verify_at(&self, token: &str, now: i64) -> AppResult<Option<UnsubscribeClaims>> {
        if token.is_empty() {
            debug!(reason = "empty", "Token rejected");
            return Ok(None);
        }

        let expected = self.scheme().arity();
        let found = segment_count(token);
        if found != expected {
            debug!(reason = "format", expected, found, "Token rejected");
            return Ok(None);
        }

        let decoded = match &self.codec {
            TokenCodec::Signed { secret } => decode_signed(token, secret.expose_secret().as_bytes()),
            TokenCodec::Encrypted { key } => decrypt_claims(token, key),
            TokenCodec::Proxy { store } => return self.verify_proxy(store.as_ref(), token, now).await,
        };

        match decoded {
            Ok(claims) => Ok(check_claims(claims, now)),
            Err(e) => {
                debug!(reason = %e, "Token rejected");
                Ok(None)
            }
        }
    }

    async fn verify_proxy(
        &self,
        store: &dyn ProxyStore,
        token: &str,
        now: i64,
    ) -> AppResult<Option<UnsubscribeClaims>> {
        if !is_proxy_id(token) {
            debug!(reason = "malformed proxy id", "Token rejected");
            return Ok(None);
        }
        let record = match self.bounded(store.get(token)).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(reason = "unknown proxy id", "Token rejected");
                return Ok(None);
            }
            Err(e @ AppError::StoreUnavailable(_)) => return Err(e),
            Err(e) => {
                warn!(error = %e, "Unreadable proxy record");
                return Ok(None);
            }
        };
        if !record.is_valid(now) {
            debug!(reason = "proxy record not valid", state = ?record.state(now), "Token rejected");
            return Ok(None);
        }
        Ok(Some(record.to_claims()))
    }

    /// Fail-closed convenience: store outages also count as "not verified".
    pub async fn verify_or_none(&self, token: &str) -> Option<UnsubscribeClaims> {
        match self.verify(token).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Verification failed closed");
                None
            }
        }
    }

    /// Consumes a proxy token. Stateless schemes have nothing to consume and
    /// return `None`.
    #[instrument(skip_all, fields(scheme = %self.scheme()))]
    pub async fn consume_at(&self, token: &str, now: i64) -> AppResult<Option<MarkUsed>> {
        let TokenCodec::Proxy { store } = &self.codec else {
            return Ok(None);
        };
        let outcome = self.bounded(store.mark_used(token, now)).await?;
        match &outcome {
            MarkUsed::Transitioned(_) => info!("Proxy record consumed"),
            MarkUsed::AlreadyUsed(_) => debug!("Proxy record already consumed"),
            MarkUsed::NotFound => debug!("Proxy record not found on consume"),
        }
        Ok(Some(outcome))
    }

    /// Deletes expired proxy records; a no-op for stateless schemes.
    pub async fn sweep_expired(&self, now: i64) -> AppResult<u64> {
        match &self.codec {
            TokenCodec::Proxy { store } => self.bounded(store.sweep_expired(now)).await,
            _ => Ok(0),
        }
    }

    /// Bounds a store call by the configured timeout. A timeout becomes
    /// `StoreUnavailable`; the store's own errors pass through unchanged.
    async fn bounded<T>(&self, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .unwrap_or_else(|_| Err(AppError::StoreUnavailable("store call timed out".into())))
    }
}

fn check_claims(claims: UnsubscribeClaims, now: i64) -> Option<UnsubscribeClaims> {
    if !claims.has_unsubscribe_type() {
        debug!(reason = "claim type", "Token rejected");
        return None;
    }
    if !claims.is_live(now) {
        debug!(reason = "expired", "Token rejected");
        return None;
    }
    Some(claims)
}
