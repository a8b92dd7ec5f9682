//! Field validation.
//!
//! Pure functions with no side effects. Validation failures are
//! field-scoped and recoverable; nothing here is fatal.

use crate::{
    consts,
    models::{playground::PlaygroundConfig, template::{HeaderFormat, MessageTemplate}},
};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use url::Url;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[1-9]\d{0,15}$").expect("hardcoded phone pattern"));
static BUTTON_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"button_(\d+)_param_(\d+)").expect("hardcoded key pattern"));

/// Outcome of a single-field validation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldValidation {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// Aggregate outcome over many fields, keyed by field name
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateValidation {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// Validates a recipient phone number in international format.
///
/// Whitespace, hyphens and parentheses are stripped before matching; the
/// remainder must be an optional `+` followed by 1-16 digits not starting
/// with zero.
pub fn validate_mobile_number(phone: &str) -> FieldValidation {
    if phone.trim().is_empty() {
        return FieldValidation::fail("Mobile number is required");
    }

    let clean: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if !PHONE_RE.is_match(&clean) {
        return FieldValidation::fail("Please enter a valid mobile number (e.g., +1234567890)");
    }

    FieldValidation::ok()
}

/// Lower-cased suffix after the last `.` of the URL path, or of the raw
/// string when it does not parse as a URL
pub fn file_extension(url: &str) -> String {
    let path = Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| url.to_string());

    path.rsplit('.').next().unwrap_or_default().to_lowercase()
}

fn allowed_extensions(format: HeaderFormat) -> &'static [&'static str] {
    match format {
        HeaderFormat::Image => &consts::ALLOWED_IMAGE_EXTENSIONS,
        HeaderFormat::Video => &consts::ALLOWED_VIDEO_EXTENSIONS,
        HeaderFormat::Document => &consts::ALLOWED_DOCUMENT_EXTENSIONS,
        _ => &[],
    }
}

/// Validates a media URL against the extension allow-list of its kind.
/// Empty input is valid; the media URL is optional until send time.
pub fn validate_media_url(url: &str, format: HeaderFormat) -> FieldValidation {
    if url.trim().is_empty() {
        return FieldValidation::ok();
    }

    if Url::parse(url).is_err() && !url.contains('.') {
        return FieldValidation::fail("Please enter a valid URL or file path with extension");
    }

    let extension = file_extension(url);
    if extension.is_empty() {
        return FieldValidation::fail("File must have a valid extension");
    }

    let allowed = allowed_extensions(format);
    if !allowed.contains(&extension.as_str()) {
        return FieldValidation::fail(format!(
            "Invalid file type. Allowed extensions for {format}: {}",
            allowed.join(", ")
        ));
    }

    FieldValidation::ok()
}

/// Checks that a template is selected and resolves to a known one
pub fn validate_template_selection(
    template_id: &str,
    templates: &[MessageTemplate],
) -> FieldValidation {
    if template_id.trim().is_empty() {
        return FieldValidation::fail("Please select a message template");
    }

    if !templates.iter().any(|template| template.id == template_id) {
        return FieldValidation::fail("Selected template not found");
    }

    FieldValidation::ok()
}

/// Checks every placeholder value is non-blank. Error messages derive from
/// the key naming convention; `button_*` keys that do not match the
/// numeric `button_{i}_param_{n}` pattern produce no error.
pub fn validate_template_placeholders(
    placeholders: &BTreeMap<String, String>,
) -> AggregateValidation {
    let mut errors = BTreeMap::new();

    for (key, value) in placeholders {
        if !value.trim().is_empty() {
            continue;
        }

        if key == consts::HEADER_MEDIA_URL_KEY {
            errors.insert(
                key.clone(),
                "Media URL is required for this template".to_string(),
            );
        } else if let Some(rest) = key.strip_prefix("header_param_") {
            errors.insert(key.clone(), format!("Header parameter {rest} is required"));
        } else if let Some(rest) = key.strip_prefix("body_param_") {
            errors.insert(key.clone(), format!("Body parameter {rest} is required"));
        } else if key.starts_with("button_") {
            if let Some(captures) = BUTTON_KEY_RE.captures(key) {
                errors.insert(
                    key.clone(),
                    format!(
                        "Button {} parameter {} is required",
                        &captures[1], &captures[2]
                    ),
                );
            }
        } else {
            errors.insert(
                key.clone(),
                format!("Parameter {} is required", key.replace("param_", "")),
            );
        }
    }

    AggregateValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Aggregates everything a test call needs: recipient phone plus either
/// the session text or the template selection and its placeholders.
pub fn validate_api_call(
    config: &PlaygroundConfig,
    templates: &[MessageTemplate],
) -> AggregateValidation {
    let mut errors = BTreeMap::new();

    let phone = validate_mobile_number(&config.recipient_phone);
    if let Some(error) = phone.error {
        errors.insert("recipient_phone".to_string(), error);
    }

    if config.is_session_message {
        if config.session_message_text.trim().is_empty() {
            errors.insert(
                "session_message_text".to_string(),
                "Session message text is required".to_string(),
            );
        } else if config.session_message_text.chars().count() > consts::MAX_SESSION_MESSAGE_CHARS
        {
            errors.insert(
                "session_message_text".to_string(),
                "Session message text cannot exceed 4096 characters".to_string(),
            );
        }
    } else {
        let template = validate_template_selection(&config.selected_template, templates);
        if let Some(error) = template.error {
            errors.insert("selected_template".to_string(), error);
        }

        if !config.template_placeholders.is_empty() {
            errors.extend(validate_template_placeholders(&config.template_placeholders).errors);
        }
    }

    AggregateValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mobile_number() {
        assert!(validate_mobile_number("+14155552671").is_valid);
        assert!(validate_mobile_number("+1 (415) 555-2671").is_valid);
        assert!(!validate_mobile_number("abc").is_valid);
        assert!(!validate_mobile_number("0123").is_valid);
        assert_eq!(
            validate_mobile_number("").error.as_deref(),
            Some("Mobile number is required")
        );
    }

    #[test]
    fn test_validate_media_url_allows_empty() {
        assert!(validate_media_url("", HeaderFormat::Image).is_valid);
        assert!(validate_media_url("   ", HeaderFormat::Image).is_valid);
    }

    #[test]
    fn test_validate_media_url_extension_allow_list() {
        assert!(validate_media_url("https://x.com/a.pdf", HeaderFormat::Document).is_valid);
        assert!(validate_media_url("https://x.com/a.png", HeaderFormat::Image).is_valid);

        let invalid = validate_media_url("https://x.com/a.exe", HeaderFormat::Document);
        assert!(!invalid.is_valid);
        assert!(invalid.error.unwrap().contains("document"));

        // extension valid for another kind still fails for this one
        assert!(!validate_media_url("https://x.com/a.pdf", HeaderFormat::Video).is_valid);
    }

    #[test]
    fn test_validate_media_url_without_scheme() {
        // not a URL but carries a dot; extension check still applies
        assert!(validate_media_url("cdn/a.jpeg", HeaderFormat::Image).is_valid);
        assert!(!validate_media_url("not-a-url", HeaderFormat::Image).is_valid);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("https://x.com/a/b.PDF"), "pdf");
        assert_eq!(file_extension("b.tar.gz"), "gz");
        // no dot in the path: the whole path comes back and fails the allow-list
        assert_eq!(file_extension("https://x.com/plain"), "/plain");
    }

    #[test]
    fn test_validate_template_selection() {
        let templates = vec![MessageTemplate {
            id: "42".to_string(),
            ..MessageTemplate::default()
        }];

        assert!(validate_template_selection("42", &templates).is_valid);
        assert_eq!(
            validate_template_selection("", &templates).error.as_deref(),
            Some("Please select a message template")
        );
        assert_eq!(
            validate_template_selection("7", &templates).error.as_deref(),
            Some("Selected template not found")
        );
    }

    #[test]
    fn test_validate_template_placeholders_messages() {
        let placeholders: BTreeMap<String, String> = [
            ("header_media_url", ""),
            ("header_param_1", ""),
            ("body_param_2", ""),
            ("button_0_param_1", ""),
            ("flow_token", ""),
        ]
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let outcome = validate_template_placeholders(&placeholders);
        assert!(!outcome.is_valid);
        assert_eq!(
            outcome.errors.get("header_media_url").unwrap(),
            "Media URL is required for this template"
        );
        assert_eq!(
            outcome.errors.get("header_param_1").unwrap(),
            "Header parameter 1 is required"
        );
        assert_eq!(
            outcome.errors.get("body_param_2").unwrap(),
            "Body parameter 2 is required"
        );
        assert_eq!(
            outcome.errors.get("button_0_param_1").unwrap(),
            "Button 0 parameter 1 is required"
        );
        assert_eq!(
            outcome.errors.get("flow_token").unwrap(),
            "Parameter flow_token is required"
        );
    }

    #[test]
    fn test_named_button_placeholder_is_silently_skipped() {
        let placeholders: BTreeMap<String, String> =
            [("button_0_param_code".to_string(), String::new())]
                .into_iter()
                .collect();

        let outcome = validate_template_placeholders(&placeholders);
        // the numeric-only key pattern does not match, so no error at all
        assert!(outcome.is_valid);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_validate_api_call_session_branch() {
        let mut config = PlaygroundConfig {
            recipient_phone: "+14155552671".to_string(),
            is_session_message: true,
            ..PlaygroundConfig::default()
        };

        let blank = validate_api_call(&config, &[]);
        assert_eq!(
            blank.errors.get("session_message_text").unwrap(),
            "Session message text is required"
        );

        config.session_message_text = "x".repeat(4097);
        let too_long = validate_api_call(&config, &[]);
        assert_eq!(
            too_long.errors.get("session_message_text").unwrap(),
            "Session message text cannot exceed 4096 characters"
        );

        config.session_message_text = "hello".to_string();
        assert!(validate_api_call(&config, &[]).is_valid);
    }

    #[test]
    fn test_validate_api_call_template_branch() {
        let templates = vec![MessageTemplate {
            id: "42".to_string(),
            ..MessageTemplate::default()
        }];

        let config = PlaygroundConfig {
            recipient_phone: "+14155552671".to_string(),
            selected_template: "42".to_string(),
            template_placeholders: [("body_param_1".to_string(), String::new())]
                .into_iter()
                .collect(),
            ..PlaygroundConfig::default()
        };

        let outcome = validate_api_call(&config, &templates);
        assert!(!outcome.is_valid);
        assert!(outcome.errors.contains_key("body_param_1"));
        assert!(!outcome.errors.contains_key("selected_template"));
    }
}
