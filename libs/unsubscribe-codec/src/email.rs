use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// Control (Cc) and format (Cf) characters: zero-width joiners, bidi marks,
/// invisible operators, BOM, soft hyphen.
fn is_invisible(c: char) -> bool {
    c.is_control() || get_general_category(c) == GeneralCategory::Format
}

/// Canonical form of an email address used in claims and as a lookup key.
///
/// NFKC-normalizes, drops control and format characters, trims
/// surrounding whitespace and lowercases. Does not validate.
pub fn normalize_email(raw: &str) -> String {
    raw.nfkc()
        .filter(|c| !is_invisible(*c))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize_email("  User@Example.COM \n"), "user@example.com");
    }

    #[test]
    fn test_strips_zero_width_and_control() {
        assert_eq!(
            normalize_email("us\u{200B}er@exa\u{FEFF}mple.com\u{0007}"),
            "user@example.com"
        );
    }

    #[test]
    fn test_strips_every_format_character() {
        let invisible = [
            '\u{00AD}', '\u{180E}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}',
            '\u{202A}', '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}', '\u{2060}', '\u{2061}',
            '\u{2062}', '\u{2063}', '\u{2064}', '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}',
            '\u{FEFF}',
        ];
        for c in invisible {
            let raw = format!("user{c}@example.com");
            assert_eq!(normalize_email(&raw), "user@example.com", "U+{:04X}", c as u32);
        }
    }

    #[test]
    fn test_fullwidth_forms_fold() {
        assert_eq!(normalize_email("ＵＳＥＲ@example.com"), "user@example.com");
    }

    #[test]
    fn test_common_variants_match_plain_lowercase_trim() {
        let variants = [
            "First.Last@Example.com",
            "user+news@Mail.Example.co.uk",
            " a.b.c@sub.domain.example.org ",
            "UPPER@CASE.IO",
        ];
        for raw in variants {
            assert_eq!(normalize_email(raw), raw.trim().to_lowercase());
        }
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_email(" Mixed\u{200D}Case@Example.com ");
        assert_eq!(normalize_email(&once), once);
    }
}
