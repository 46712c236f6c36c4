use sha2::{Digest, Sha256};
use unsubscribe_codec::normalize_email;

/// Normalizes an address and checks the minimal shape issuance accepts:
/// non-empty with an `@`. Returns the normalized form.
pub fn normalized_email(raw: &str) -> Option<String> {
    let email = normalize_email(raw);
    if email.is_empty() || !email.contains('@') {
        return None;
    }
    Some(email)
}

/// Short stable fingerprint for logs, so raw addresses never reach them.
pub fn email_fingerprint(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    hex::encode(&digest[..6])
}
