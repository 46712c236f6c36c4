//! Claim types and token codecs for one-click unsubscribe links.
//!
//! This crate provides:
//! - The `UnsubscribeClaims` structure and email normalization
//! - Signed tokens (HS256 compact JWS)
//! - Encrypted tokens (AES-256-GCM, `iv.ciphertext.tag`)
//! - Proxy id generation and the delimited cell encoding used to store proxy
//!   records in shared free-text fields
//!
//! Everything here is pure: no I/O, no clocks. Callers pass `now` explicitly.

mod claims;
mod email;
mod encrypted;
mod errors;
mod proxy;
mod shape;
mod signed;

pub use claims::{CLAIM_TYPE, UnsubscribeClaims};
pub use email::normalize_email;
pub use encrypted::{EncryptionKey, decrypt_claims, encrypt_claims};
pub use errors::CodecError;
pub use proxy::{
    PROXY_ID_LEN, ProxyCell, ProxyCellStatus, encode_cell, generate_proxy_id, is_proxy_id,
    mark_cell_used, parse_cell,
};
pub use shape::{is_token_char, segment_count, segments};
pub use signed::{decode_signed, encode_signed};
