//! Proxy ids and the cell encoding for proxy records.
//!
//! A proxy id is 6 random bytes rendered as 8 base64url characters. Records
//! can be kept in a shared free-text field (a spreadsheet cell that may hold
//! anything else), so the cell encoding is strict and parses to `None` on any
//! deviation:
//!
//! ```text
//! unsub|active|<id>|<expires_at>
//! unsub|used|<id>|<expires_at>|<used_at>
//! ```

use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;

pub const PROXY_ID_LEN: usize = 8;
const PROXY_ID_BYTES: usize = 6;

const CELL_TAG: &str = "unsub";
const CELL_SEP: char = '|';

pub fn generate_proxy_id() -> String {
    let mut bytes = [0u8; PROXY_ID_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn is_proxy_id(value: &str) -> bool {
    value.len() == PROXY_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyCellStatus {
    Active,
    Used,
}

impl ProxyCellStatus {
    fn as_str(&self) -> &'static str {
        match self {
            ProxyCellStatus::Active => "active",
            ProxyCellStatus::Used => "used",
        }
    }
}

/// Decoded cell contents. The owning row supplies the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCell {
    pub status: ProxyCellStatus,
    pub proxy_id: String,
    pub expires_at: i64,
    pub used_at: Option<i64>,
}

impl ProxyCell {
    pub fn is_valid(&self, now: i64) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }

    pub fn encode(&self) -> String {
        let mut out = format!(
            "{CELL_TAG}{CELL_SEP}{}{CELL_SEP}{}{CELL_SEP}{}",
            self.status.as_str(),
            self.proxy_id,
            self.expires_at
        );
        if let Some(used_at) = self.used_at {
            out.push(CELL_SEP);
            out.push_str(&used_at.to_string());
        }
        out
    }
}

pub fn encode_cell(proxy_id: &str, expires_at: i64) -> String {
    ProxyCell {
        status: ProxyCellStatus::Active,
        proxy_id: proxy_id.to_string(),
        expires_at,
        used_at: None,
    }
    .encode()
}

pub fn parse_cell(value: &str) -> Option<ProxyCell> {
    let parts: Vec<&str> = value.trim().split(CELL_SEP).collect();
    if parts.len() < 4 || parts[0] != CELL_TAG {
        return None;
    }

    let proxy_id = parts[2];
    if !is_proxy_id(proxy_id) {
        return None;
    }
    let expires_at: i64 = parts[3].parse().ok()?;

    let (status, used_at) = match (parts[1], parts.len()) {
        ("active", 4) => (ProxyCellStatus::Active, None),
        ("used", 5) => (ProxyCellStatus::Used, Some(parts[4].parse::<i64>().ok()?)),
        _ => return None,
    };

    Some(ProxyCell {
        status,
        proxy_id: proxy_id.to_string(),
        expires_at,
        used_at,
    })
}

/// Marks an encoded cell as used at `now`.
///
/// An already-used cell comes back byte-identical, so applying this twice is
/// the same as applying it once. Returns `None` for anything that is not a
/// proxy cell.
pub fn mark_cell_used(value: &str, now: i64) -> Option<String> {
    let cell = parse_cell(value)?;
    if cell.used_at.is_some() {
        return Some(value.to_string());
    }
    Some(
        ProxyCell {
            status: ProxyCellStatus::Used,
            used_at: Some(now),
            ..cell
        }
        .encode(),
    )
}
