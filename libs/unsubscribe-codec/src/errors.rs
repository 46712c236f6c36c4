use thiserror::Error;

/// Token codec errors.
///
/// These stay internal to verification: callers of the verifier only ever see
/// "valid" or "not valid", never which of these occurred.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Expected {expected} token segments, found {found}")]
    Format { expected: usize, found: usize },

    #[error("Invalid segment encoding: {0}")]
    Encoding(String),

    #[error("Invalid signature")]
    Signature,

    #[error("Decryption failed")]
    Decryption,

    #[error("Invalid claims: {0}")]
    Claims(String),

    #[error("Invalid key: {0}")]
    Key(String),

    #[error("JWT library error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
