use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{tokens::TokenUseCases, unsubscribe::UnsubscribeUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_use_cases: Arc<TokenUseCases>,
    pub unsubscribe_use_cases: Arc<UnsubscribeUseCases>,
}
