//! Log sanitization utilities
//!
//! Keeps response bodies (which may echo tokens or personal data) from being
//! written to the log in full.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Replace every `"token":"..."` value in a JSON body with a placeholder.
///
/// Login and register responses carry the bearer credential in the body.
pub fn redact_tokens(body: &str) -> String {
    const KEY: &str = "\"token\"";

    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(pos) = rest.find(KEY) {
        let (head, tail) = rest.split_at(pos + KEY.len());
        out.push_str(head);

        let after_colon = tail.trim_start();
        let Some(value) = after_colon.strip_prefix(':') else {
            rest = tail;
            continue;
        };
        let value = value.trim_start();
        let Some(quoted) = value.strip_prefix('"') else {
            rest = tail;
            continue;
        };
        match quoted.find('"') {
            Some(end) => {
                out.push_str(":\"[redacted]\"");
                rest = &quoted[end + 1..];
            }
            None => {
                out.push_str(":\"[redacted]");
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        let s = "hello world";
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
        assert!(result.contains(&format!("{} bytes]", TRUNCATE_LIMIT + 100)));
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "é".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }

    #[test]
    fn token_values_are_redacted() {
        let body = r#"{"user":{"id":"u1"},"token": "eyJhbGciOi.payload.sig"}"#;
        let redacted = redact_tokens(body);
        assert!(!redacted.contains("eyJhbGciOi"));
        assert!(redacted.contains(r#""token":"[redacted]"}"#));
        assert!(redacted.contains(r#""user":{"id":"u1"}"#));
    }

    #[test]
    fn body_without_token_is_unchanged() {
        let body = r#"{"quota":{"used":1}}"#;
        assert_eq!(redact_tokens(body), body);
    }
}
