//! Comment text sanitization.
//!
//! Downstream text analysis wants prose, not markup noise: URLs, @/#
//! handles, and zero-width characters are stripped and whitespace is
//! collapsed. A comment whose text sanitizes down to the empty string is
//! dropped by the pipeline.

use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static HANDLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@#]\S+").unwrap());
static ZERO_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{200B}-\x{200D}\x{FEFF}]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strips URLs, handles, and zero-width characters, collapses whitespace,
/// and trims. Returns an empty string when nothing survives.
pub fn sanitize_comment_text(raw: &str) -> String {
    let text = URL_RE.replace_all(raw, "");
    let text = HANDLE_RE.replace_all(&text, "");
    let text = ZERO_WIDTH_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_urls() {
        assert_eq!(
            sanitize_comment_text("great deal https://shop.example/x?a=1 loved it"),
            "great deal loved it"
        );
    }

    #[test]
    fn test_strips_handles_and_hashtags() {
        assert_eq!(
            sanitize_comment_text("thanks @someone for the tip #shopping"),
            "thanks for the tip"
        );
    }

    #[test]
    fn test_strips_zero_width_characters() {
        assert_eq!(sanitize_comment_text("so\u{200B}ld \u{FEFF}out"), "sold out");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize_comment_text("  too \n\t many   spaces "), "too many spaces");
    }

    #[test]
    fn test_url_only_comment_sanitizes_to_empty() {
        assert_eq!(sanitize_comment_text("https://spam.example/offer"), "");
        assert_eq!(sanitize_comment_text(""), "");
    }
}
