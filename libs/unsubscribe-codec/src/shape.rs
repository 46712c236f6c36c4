/// Characters any well-formed token may contain: base64url plus the `.` separator.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

pub fn segments(token: &str) -> Vec<&str> {
    token.split('.').collect()
}

pub fn segment_count(token: &str) -> usize {
    token.split('.').count()
}
