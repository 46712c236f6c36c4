use std::net::SocketAddr;

use env_helpers::get_env_default;
use secrecy::SecretString;
use strum::{Display, EnumString};
use time::Duration;
use url::Url;

use crate::{domain::entities::token_scheme::TokenScheme, infra::error::InfraError};

/// Where proxy records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProxyBackend {
    Redis,
    /// Process-local; records are lost on restart.
    Memory,
}

pub struct AppConfig {
    pub token_scheme: TokenScheme,
    pub signing_secret: Option<SecretString>,
    /// Base64 of 32 random bytes.
    pub encryption_key: Option<SecretString>,
    pub token_ttl: Duration,
    pub proxy_ttl: Duration,
    pub proxy_backend: ProxyBackend,
    pub redis_url: String,
    pub store_timeout: std::time::Duration,
    pub proxy_sweep_secs: u64,
    pub app_origin: Url,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let token_scheme: TokenScheme = parse_var("TOKEN_SCHEME", "proxy")?;
        let signing_secret = optional_secret("UNSUBSCRIBE_SIGNING_SECRET");
        let encryption_key = optional_secret("UNSUBSCRIBE_ENCRYPTION_KEY");

        let token_ttl_days: i64 = get_env_default("TOKEN_TTL_DAYS", 30);
        let proxy_ttl_days: i64 = get_env_default("PROXY_TTL_DAYS", 90);

        let proxy_backend: ProxyBackend = parse_var("PROXY_STORE", "redis")?;
        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let store_timeout_ms: u64 = get_env_default("STORE_TIMEOUT_MS", 2000);
        let proxy_sweep_secs: u64 = get_env_default("PROXY_SWEEP_SECS", 3600);

        let app_origin: Url = std::env::var("APP_ORIGIN")
            .map_err(|_| InfraError::ConfigMissing { var: "APP_ORIGIN" })?
            .parse()
            .map_err(|_| InfraError::ConfigInvalid { var: "APP_ORIGIN" })?;
        let bind_addr: SocketAddr = parse_var("BIND_ADDR", "127.0.0.1:3001")?;

        Ok(Self {
            token_scheme,
            signing_secret,
            encryption_key,
            token_ttl: Duration::days(token_ttl_days),
            proxy_ttl: Duration::days(proxy_ttl_days),
            proxy_backend,
            redis_url,
            store_timeout: std::time::Duration::from_millis(store_timeout_ms),
            proxy_sweep_secs,
            app_origin,
            bind_addr,
        })
    }

    /// Lifetime of tokens issued under the configured scheme.
    pub fn ttl(&self) -> Duration {
        match self.token_scheme {
            TokenScheme::Proxy => self.proxy_ttl,
            TokenScheme::Signed | TokenScheme::Encrypted => self.token_ttl,
        }
    }
}

fn optional_secret(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| SecretString::new(v.into()))
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: &str) -> Result<T, InfraError> {
    std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| InfraError::ConfigInvalid { var })
}
