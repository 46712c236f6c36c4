use dotenvy::dotenv;
use tracing::info;

use std::net::SocketAddr;
use unsubscribe_link::infra::{
    app::create_app, error::InfraError, proxy_sweeper::run_proxy_sweep_loop,
    setup::init_app_state,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let app_state = init_app_state().await?;

    // Read what we need from config before moving app_state
    let bind_addr = app_state.config.bind_addr;
    let sweep_secs = app_state.config.proxy_sweep_secs;
    let scheme = app_state.token_use_cases.scheme();
    let backend = app_state.config.proxy_backend;
    let tokens = app_state.token_use_cases.clone();

    let app = create_app(app_state);

    info!(%scheme, %backend, "Unsubscribe token scheme configured");
    if !scheme.is_stateless() {
        tokio::spawn(run_proxy_sweep_loop(tokens, sweep_secs));
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(InfraError::Server)?;

    Ok(())
}
