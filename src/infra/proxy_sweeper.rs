use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, error, info};

use crate::use_cases::tokens::{TokenUseCases, now_unix};

pub async fn run_proxy_sweep_loop(tokens: Arc<TokenUseCases>, every_secs: u64) {
    let mut ticker = interval(Duration::from_secs(every_secs.max(1)));

    info!(
        "Proxy sweep service started (sweeping every {}s)",
        every_secs
    );

    loop {
        ticker.tick().await;
        sweep_once(&tokens, now_unix()).await;
    }
}

/// One sweep pass. Failures are logged; the next tick tries again.
pub async fn sweep_once(tokens: &TokenUseCases, now: i64) -> u64 {
    match tokens.sweep_expired(now).await {
        Ok(0) => {
            debug!("Proxy sweep found nothing to remove");
            0
        }
        Ok(removed) => {
            info!(removed, "Swept expired proxy records");
            removed
        }
        Err(e) => {
            error!(error = %e, "Proxy sweep failed");
            0
        }
    }
}
