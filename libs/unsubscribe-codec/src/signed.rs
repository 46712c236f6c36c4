use std::collections::HashSet;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use crate::{CodecError, UnsubscribeClaims, segment_count};

const SIGNED_SEGMENTS: usize = 3;

/// Renders claims as `header.payload.signature` (HS256).
pub fn encode_signed(claims: &UnsubscribeClaims, secret: &[u8]) -> Result<String, CodecError> {
    if secret.is_empty() {
        return Err(CodecError::Key("signing secret is empty".into()));
    }
    let header = Header::new(Algorithm::HS256);
    Ok(encode(&header, claims, &EncodingKey::from_secret(secret))?)
}

/// Checks the signature and decodes the payload.
///
/// Only HS256 is accepted. Expiry and claim type are not checked here; the
/// caller owns the clock.
pub fn decode_signed(token: &str, secret: &[u8]) -> Result<UnsubscribeClaims, CodecError> {
    let found = segment_count(token);
    if found != SIGNED_SEGMENTS {
        return Err(CodecError::Format {
            expected: SIGNED_SEGMENTS,
            found,
        });
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<UnsubscribeClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            if matches!(e.kind(), ErrorKind::InvalidSignature) {
                CodecError::Signature
            } else {
                CodecError::Jwt(e)
            }
        })?;
    Ok(data.claims)
}
