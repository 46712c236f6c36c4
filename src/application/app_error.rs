use thiserror::Error;

use crate::domain::entities::token_scheme::TokenScheme;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every token failure collapses here: bad shape, bad signature, failed
    /// decryption, wrong claim type, expired, consumed or unknown proxy id.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("No key configured for the {scheme} token scheme")]
    MissingSigningKey { scheme: TokenScheme },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidEmail,
    InvalidInput,
    InvalidOrExpired,
    StoreUnavailable,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidOrExpired => "INVALID_OR_EXPIRED",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidEmail => ErrorCode::InvalidEmail,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::InvalidToken => ErrorCode::InvalidOrExpired,
            AppError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            AppError::MissingSigningKey { .. } | AppError::Internal(_) => {
                ErrorCode::InternalError
            }
        }
    }

    /// Infrastructure trouble the caller may retry; token problems are never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
