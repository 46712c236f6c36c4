use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::ProxyStore,
        use_cases::{
            tokens::{TokenCodec, TokenUseCases},
            unsubscribe::UnsubscribeUseCases,
        },
    },
    infra::{
        config::{AppConfig, ProxyBackend},
        error::InfraError,
        memory_store::InMemoryProxyStore,
        proxy_store::RedisProxyStore,
        suppression_list::RedisSuppressionList,
    },
};
use redis::aio::ConnectionManager;
use secrecy::ExposeSecret;
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use unsubscribe_codec::EncryptionKey;

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let mut config = AppConfig::from_env()?;

    let encryption_key = config
        .encryption_key
        .take()
        .map(|key| {
            EncryptionKey::from_base64(key.expose_secret()).map_err(|source| {
                InfraError::InvalidKey {
                    var: "UNSUBSCRIBE_ENCRYPTION_KEY",
                    source,
                }
            })
        })
        .transpose()?;

    let client = redis::Client::open(config.redis_url.as_str()).map_err(InfraError::from)?;
    let manager = ConnectionManager::new(client)
        .await
        .map_err(InfraError::from)?;

    let proxy_store: Arc<dyn ProxyStore> = match config.proxy_backend {
        ProxyBackend::Redis => Arc::new(RedisProxyStore::new(manager.clone())),
        ProxyBackend::Memory => Arc::new(InMemoryProxyStore::new()),
    };

    let codec = TokenCodec::from_parts(
        config.token_scheme,
        config.signing_secret.take(),
        encryption_key,
        proxy_store,
    )
    .map_err(InfraError::MissingSigningKey)?;

    let token_use_cases = Arc::new(TokenUseCases::new(
        codec,
        config.ttl(),
        config.store_timeout,
    ));

    let unsubscribe_use_cases = UnsubscribeUseCases::new(
        token_use_cases.clone(),
        Arc::new(RedisSuppressionList::new(manager)),
        config.app_origin.clone(),
    );

    Ok(AppState {
        config: Arc::new(config),
        token_use_cases,
        unsubscribe_use_cases: Arc::new(unsubscribe_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "unsubscribe_link=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs); console only when the file cannot be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
