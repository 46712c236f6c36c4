//! Test data factories: keys, config and ready-made token use cases.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use time::Duration;
use unsubscribe_codec::EncryptionKey;
use url::Url;

use crate::{
    application::{
        ports::ProxyStore,
        use_cases::tokens::{TokenCodec, TokenUseCases},
    },
    domain::entities::token_scheme::TokenScheme,
    infra::{
        config::{AppConfig, ProxyBackend},
        memory_store::InMemoryProxyStore,
    },
};

pub const TEST_SIGNING_SECRET: &str = "test_unsubscribe_signing_secret";

/// Fixed key for reproducible tests (32 'B' bytes).
pub fn test_encryption_key() -> EncryptionKey {
    EncryptionKey::from_bytes([b'B'; 32])
}

pub fn test_store_timeout() -> std::time::Duration {
    std::time::Duration::from_secs(1)
}

/// Token use cases for `scheme` with its default ttl and a fresh in-memory store.
pub fn token_use_cases(scheme: TokenScheme) -> TokenUseCases {
    token_use_cases_with_store(scheme, Arc::new(InMemoryProxyStore::new()))
}

pub fn token_use_cases_with_store(
    scheme: TokenScheme,
    store: Arc<dyn ProxyStore>,
) -> TokenUseCases {
    let codec = TokenCodec::from_parts(
        scheme,
        Some(SecretString::new(TEST_SIGNING_SECRET.into())),
        Some(test_encryption_key()),
        store,
    )
    .unwrap();
    TokenUseCases::new(codec, scheme.default_ttl(), test_store_timeout())
}

pub fn signed_use_cases(secret: &str) -> TokenUseCases {
    TokenUseCases::new(
        TokenCodec::Signed {
            secret: SecretString::new(secret.into()),
        },
        TokenScheme::Signed.default_ttl(),
        test_store_timeout(),
    )
}

pub fn test_config() -> AppConfig {
    AppConfig {
        token_scheme: TokenScheme::Proxy,
        signing_secret: None,
        encryption_key: None,
        token_ttl: Duration::days(30),
        proxy_ttl: Duration::days(90),
        proxy_backend: ProxyBackend::Memory,
        redis_url: String::new(),
        store_timeout: test_store_timeout(),
        proxy_sweep_secs: 3600,
        app_origin: Url::parse("http://localhost:3000").unwrap(),
        bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
    }
}

/// Replaces the character at `index` with a different token character.
pub fn flip_char(token: &str, index: usize) -> String {
    token
        .chars()
        .enumerate()
        .map(|(i, c)| match (i == index, c) {
            (false, c) => c,
            (true, 'A') => 'B',
            (true, _) => 'A',
        })
        .collect()
}
