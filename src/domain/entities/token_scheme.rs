use strum::{Display, EnumString};
use time::Duration;

/// Wire shape of an unsubscribe token.
///
/// `Signed` and `Encrypted` are stateless; `Proxy` references a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenScheme {
    Signed,
    Encrypted,
    Proxy,
}

impl TokenScheme {
    /// Number of `.`-separated segments a token of this scheme has.
    pub fn arity(&self) -> usize {
        match self {
            TokenScheme::Signed | TokenScheme::Encrypted => 3,
            TokenScheme::Proxy => 1,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        match self {
            TokenScheme::Signed | TokenScheme::Encrypted => Duration::days(30),
            TokenScheme::Proxy => Duration::days(90),
        }
    }

    pub fn is_stateless(&self) -> bool {
        !matches!(self, TokenScheme::Proxy)
    }
}
