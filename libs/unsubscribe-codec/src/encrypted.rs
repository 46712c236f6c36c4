use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose};

use crate::{CodecError, UnsubscribeClaims, segments};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;
const ENCRYPTED_SEGMENTS: usize = 3;

/// 256-bit AES-GCM key for the encrypted token scheme.
#[derive(Clone)]
pub struct EncryptionKey {
    key: aes_gcm::Key<Aes256Gcm>,
}

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            key: *aes_gcm::Key::<Aes256Gcm>::from_slice(&bytes),
        }
    }

    /// Accepts standard base64 that decodes to exactly 32 bytes.
    pub fn from_base64(key_b64: &str) -> Result<Self, CodecError> {
        let raw = general_purpose::STANDARD
            .decode(key_b64.trim().as_bytes())
            .map_err(|e| CodecError::Key(format!("encryption key is not base64: {e}")))?;
        let bytes: [u8; KEY_LEN] = raw
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::Key(format!("encryption key must decode to {KEY_LEN} bytes")))?;
        Ok(Self::from_bytes(bytes))
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// Renders claims as `iv.ciphertext.tag` under a fresh random nonce.
pub fn encrypt_claims(
    claims: &UnsubscribeClaims,
    key: &EncryptionKey,
) -> Result<String, CodecError> {
    let plaintext = serde_json::to_vec(claims).map_err(|e| CodecError::Claims(e.to_string()))?;

    let cipher = Aes256Gcm::new(&key.key);
    let nonce_bytes = rand::random::<[u8; NONCE_LEN]>();
    let nonce = Nonce::from_slice(&nonce_bytes);
    let sealed = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| CodecError::Claims(format!("encrypt failed: {e}")))?;

    // aes-gcm appends the tag to the ciphertext.
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    let engine = general_purpose::URL_SAFE_NO_PAD;
    Ok(format!(
        "{}.{}.{}",
        engine.encode(nonce_bytes),
        engine.encode(ciphertext),
        engine.encode(tag)
    ))
}

/// Authenticates and decrypts an `iv.ciphertext.tag` token.
///
/// A bad tag, wrong key or non-JSON plaintext all come back as errors; nothing
/// here panics on attacker-controlled input.
pub fn decrypt_claims(token: &str, key: &EncryptionKey) -> Result<UnsubscribeClaims, CodecError> {
    let parts = segments(token);
    if parts.len() != ENCRYPTED_SEGMENTS {
        return Err(CodecError::Format {
            expected: ENCRYPTED_SEGMENTS,
            found: parts.len(),
        });
    }

    let engine = general_purpose::URL_SAFE_NO_PAD;
    let decode = |segment: &str, name: &str| {
        engine
            .decode(segment.as_bytes())
            .map_err(|e| CodecError::Encoding(format!("{name}: {e}")))
    };
    let nonce_bytes = decode(parts[0], "iv")?;
    let ciphertext = decode(parts[1], "ciphertext")?;
    let tag = decode(parts[2], "tag")?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(CodecError::Encoding(format!(
            "iv must be {NONCE_LEN} bytes, got {}",
            nonce_bytes.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(CodecError::Encoding(format!(
            "tag must be {TAG_LEN} bytes, got {}",
            tag.len()
        )));
    }

    let mut sealed = ciphertext;
    sealed.extend_from_slice(&tag);

    let cipher = Aes256Gcm::new(&key.key);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), sealed.as_slice())
        .map_err(|_| CodecError::Decryption)?;

    serde_json::from_slice(&plaintext).map_err(|e| CodecError::Claims(e.to_string()))
}
