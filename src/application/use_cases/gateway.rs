//! Verification of tokens that travelled through link-rewriting mail gateways.
//!
//! The only repair attempted is a single URL-decode when the presented value
//! contains `%` (double encoding by an upstream hop). Other damage is
//! classified for operators and then treated as a lost request; there is no
//! attempt to reverse per-position character substitution.

use std::sync::Arc;

use tracing::{info, warn};
use unsubscribe_codec::{UnsubscribeClaims, is_token_char, segments};

use crate::{
    app_error::AppResult, application::use_cases::tokens::TokenUseCases,
    domain::entities::token_scheme::TokenScheme,
};

/// A verified token and the exact string that verified (after any repair).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub token: String,
    pub claims: UnsubscribeClaims,
    pub repaired: bool,
}

/// Why a presented value failed, for logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    Empty,
    WrongArity { expected: usize, found: usize },
    /// Characters or segment shapes an issued token never has.
    CharacterSubstitution { detail: &'static str },
    /// Well-formed but rejected: expired, bad signature or tag, consumed, unknown.
    Rejected,
}

pub struct GatewayResilience {
    tokens: Arc<TokenUseCases>,
}

impl GatewayResilience {
    pub fn new(tokens: Arc<TokenUseCases>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &Arc<TokenUseCases> {
        &self.tokens
    }

    pub async fn verify_presented(&self, raw: &str) -> AppResult<Option<VerifiedToken>> {
        self.verify_presented_at(raw, super::tokens::now_unix()).await
    }

    pub async fn verify_presented_at(
        &self,
        raw: &str,
        now: i64,
    ) -> AppResult<Option<VerifiedToken>> {
        if let Some(claims) = self.tokens.verify_at(raw, now).await? {
            return Ok(Some(VerifiedToken {
                token: raw.to_string(),
                claims,
                repaired: false,
            }));
        }

        if raw.contains('%')
            && let Ok(decoded) = urlencoding::decode(raw)
            && decoded != raw
        {
            if let Some(claims) = self.tokens.verify_at(&decoded, now).await? {
                info!(scheme = %self.tokens.scheme(), "Token verified after URL-decode repair");
                return Ok(Some(VerifiedToken {
                    token: decoded.into_owned(),
                    claims,
                    repaired: true,
                }));
            }
        }

        let class = classify_failure(raw, self.tokens.scheme());
        warn!(
            scheme = %self.tokens.scheme(),
            class = ?class,
            len = raw.len(),
            "Presented unsubscribe token failed verification"
        );
        Ok(None)
    }
}

/// Classifies a value that failed verification. Never used to reconstruct it.
pub fn classify_failure(raw: &str, scheme: TokenScheme) -> FailureClass {
    if raw.is_empty() {
        return FailureClass::Empty;
    }

    let parts = segments(raw);
    if parts.len() != scheme.arity() {
        return FailureClass::WrongArity {
            expected: scheme.arity(),
            found: parts.len(),
        };
    }

    if !raw.chars().all(is_token_char) {
        return FailureClass::CharacterSubstitution {
            detail: "characters outside the token alphabet",
        };
    }

    match scheme {
        // Both segments are base64url JSON objects, which always start with `{"`.
        TokenScheme::Signed if !parts[0].starts_with("eyJ") || !parts[1].starts_with("eyJ") => {
            FailureClass::CharacterSubstitution {
                detail: "header or payload no longer encodes a JSON object",
            }
        }
        TokenScheme::Encrypted if parts[0].len() != 16 || parts[2].len() != 22 => {
            FailureClass::CharacterSubstitution {
                detail: "iv or tag segment has the wrong length",
            }
        }
        TokenScheme::Proxy if raw.len() != unsubscribe_codec::PROXY_ID_LEN => {
            FailureClass::CharacterSubstitution {
                detail: "proxy id has the wrong length",
            }
        }
        _ => FailureClass::Rejected,
    }
}
