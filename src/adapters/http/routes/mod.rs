pub mod unsubscribe;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(unsubscribe::router())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
