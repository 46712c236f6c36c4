//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` creates an `AppState` wired to in-memory mocks, so
//! routes can be exercised with `axum_test::TestServer` without Redis.

use std::sync::Arc;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::{ProxyStore, SuppressionList},
        use_cases::unsubscribe::UnsubscribeUseCases,
    },
    domain::entities::token_scheme::TokenScheme,
    infra::memory_store::InMemoryProxyStore,
    test_utils::{
        FailingProxyStore, InMemorySuppressionList, test_config, token_use_cases_with_store,
    },
};

pub struct TestAppStateBuilder {
    scheme: TokenScheme,
    failing_store: bool,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    /// Proxy scheme over a working in-memory store.
    pub fn new() -> Self {
        Self {
            scheme: TokenScheme::Proxy,
            failing_store: false,
        }
    }

    pub fn with_scheme(mut self, scheme: TokenScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Proxy scheme whose store errors on every call.
    pub fn with_failing_store(mut self) -> Self {
        self.scheme = TokenScheme::Proxy;
        self.failing_store = true;
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    /// Builds the state and returns the mocks behind it for assertions.
    pub fn build_with_mocks(
        self,
    ) -> (
        AppState,
        Arc<InMemorySuppressionList>,
        Arc<InMemoryProxyStore>,
    ) {
        let memory_store = Arc::new(InMemoryProxyStore::new());
        let store: Arc<dyn ProxyStore> = if self.failing_store {
            Arc::new(FailingProxyStore)
        } else {
            memory_store.clone()
        };
        let suppression = Arc::new(InMemorySuppressionList::new());

        let mut config = test_config();
        config.token_scheme = self.scheme;

        let token_use_cases = Arc::new(token_use_cases_with_store(self.scheme, store));
        let unsubscribe_use_cases = UnsubscribeUseCases::new(
            token_use_cases.clone(),
            suppression.clone() as Arc<dyn SuppressionList>,
            config.app_origin.clone(),
        );

        let app_state = AppState {
            config: Arc::new(config),
            token_use_cases,
            unsubscribe_use_cases: Arc::new(unsubscribe_use_cases),
        };
        (app_state, suppression, memory_store)
    }
}
