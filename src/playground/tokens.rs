//! Placeholder token scanning.
//!
//! A token is a `{{K}}` substring where `K` is either a decimal integer
//! (positional) or an identifier (named). One combined scan in document
//! order feeds both placeholder extraction and payload compilation, so the
//! two can never disagree on which tokens a text field carries.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("hardcoded token pattern"));
static POSITIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("hardcoded positional pattern"));
static NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").expect("hardcoded named pattern"));

/// A placeholder token found in a template text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Text between the braces
    pub inner: String,
    /// `{{1}}`-style tokens; named tokens carry a `parameter_name` on the wire
    pub positional: bool,
}

impl Token {
    /// The literal `{{K}}` form, used as substitution fallback
    pub fn literal(&self) -> String {
        format!("{{{{{}}}}}", self.inner)
    }
}

fn classify(inner: &str) -> Option<Token> {
    if POSITIONAL_RE.is_match(inner) {
        return Some(Token {
            inner: inner.to_string(),
            positional: true,
        });
    }

    if NAMED_RE.is_match(inner) {
        return Some(Token {
            inner: inner.to_string(),
            positional: false,
        });
    }

    // neither positional nor a valid identifier; left as literal text
    None
}

/// Scans all tokens of `text` in document order
pub fn scan_tokens(text: &str) -> Vec<Token> {
    TOKEN_RE
        .captures_iter(text)
        .filter_map(|captures| classify(&captures[1]))
        .collect()
}

/// First token of `text`, if any. Button fields resolve at most one token.
pub fn first_token(text: &str) -> Option<Token> {
    scan_tokens(text).into_iter().next()
}

/// Builds the placeholder key for a token found under `prefix`
/// (`header`, `body` or `button_{i}`)
pub fn placeholder_key(prefix: &str, inner: &str) -> String {
    format!("{prefix}_param_{inner}")
}

/// A slice of template text, split at token boundaries.
///
/// The boundary pattern is `(\{\{[^}]+\}\})`: any `{{...}}` run counts as a
/// token segment here, resolved or not, so a rendering layer can highlight
/// whatever substitution left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextSegment {
    Literal { text: String },
    Token { text: String },
}

/// Splits `text` into literal and token segments, preserving order
pub fn split_segments(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for token_match in TOKEN_RE.find_iter(text) {
        if token_match.start() > last {
            segments.push(TextSegment::Literal {
                text: text[last..token_match.start()].to_string(),
            });
        }
        segments.push(TextSegment::Token {
            text: token_match.as_str().to_string(),
        });
        last = token_match.end();
    }

    if last < text.len() {
        segments.push(TextSegment::Literal {
            text: text[last..].to_string(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_tokens_in_document_order() {
        let tokens = scan_tokens("Hi {{name}}, your code is {{1}}");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].inner, "name");
        assert!(!tokens[0].positional);
        assert_eq!(tokens[1].inner, "1");
        assert!(tokens[1].positional);
    }

    #[test]
    fn test_scan_tokens_skips_invalid_inners() {
        let tokens = scan_tokens("{{foo bar}} {{2}} {{9lives}}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].inner, "2");
    }

    #[test]
    fn test_first_token() {
        assert_eq!(
            first_token("https://x.com/{{1}}/{{2}}").map(|t| t.inner),
            Some("1".to_string())
        );
        assert_eq!(first_token("no tokens here"), None);
    }

    #[test]
    fn test_token_literal_round_trip() {
        let token = first_token("{{otp_code}}").unwrap();
        assert_eq!(token.literal(), "{{otp_code}}");
    }

    #[test]
    fn test_split_segments_keeps_unresolved_tokens() {
        let segments = split_segments("Hi {{1}}, bye");
        assert_eq!(
            segments,
            vec![
                TextSegment::Literal {
                    text: "Hi ".to_string()
                },
                TextSegment::Token {
                    text: "{{1}}".to_string()
                },
                TextSegment::Literal {
                    text: ", bye".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_split_segments_no_tokens() {
        assert_eq!(
            split_segments("plain"),
            vec![TextSegment::Literal {
                text: "plain".to_string()
            }]
        );
    }
}
