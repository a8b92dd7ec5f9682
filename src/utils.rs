//! Helper functions could be used in front/, services/, ...

use serde::Serialize;
use std::sync::LazyLock;

/// Client to make http requests
pub static REQUEST_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// Pretty-prints a JSON value with a custom indent width.
///
/// The generated code snippets embed the request body with per-language
/// indentation, so the default two-space `to_string_pretty` is not enough.
pub fn pretty_json(value: &serde_json::Value, indent: usize) -> String {
    let indent_str = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }

    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_json_indent_width() {
        let value = json!({"to": "+15550001111"});
        assert_eq!(pretty_json(&value, 4), "{\n    \"to\": \"+15550001111\"\n}");
        assert_eq!(pretty_json(&value, 2), "{\n  \"to\": \"+15550001111\"\n}");
    }
}
