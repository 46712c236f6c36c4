use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        match &self {
            AppError::InvalidToken | AppError::InvalidEmail | AppError::InvalidInput(_) => {
                tracing::warn!(error = %self, "Request rejected")
            }
            e if e.is_retryable() => tracing::warn!(error = %e, "Request failed, retryable"),
            _ => tracing::error!(error = %self, "Request failed"),
        }

        let code = self.code();
        match self {
            AppError::InvalidEmail | AppError::InvalidToken => {
                error_resp(StatusCode::BAD_REQUEST, code, None)
            }
            AppError::InvalidInput(msg) => error_resp(StatusCode::BAD_REQUEST, code, Some(msg)),
            AppError::StoreUnavailable(_) => {
                error_resp(StatusCode::SERVICE_UNAVAILABLE, code, None)
            }
            AppError::MissingSigningKey { .. } | AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
