//! One-click unsubscribe endpoint.
//!
//! `GET` serves people clicking the link; `POST` serves mail clients doing
//! RFC 8058 one-click (`List-Unsubscribe=One-Click` body, token in the query).
//! Both perform the unsubscribe and answer identically.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
};

#[derive(Deserialize)]
struct UnsubscribeQuery {
    #[serde(default)]
    token: String,
}

#[derive(Serialize)]
struct UnsubscribeResponse {
    success: bool,
}

/// GET|POST /unsubscribe?token=...
async fn unsubscribe(
    State(app_state): State<AppState>,
    query: Result<Query<UnsubscribeQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    // A query that does not deserialize is just another unusable link.
    let Query(query) = query.map_err(|_| AppError::InvalidToken)?;

    app_state
        .unsubscribe_use_cases
        .unsubscribe(&query.token)
        .await?;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(UnsubscribeResponse { success: true }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/unsubscribe", get(unsubscribe).post(unsubscribe))
}
