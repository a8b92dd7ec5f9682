//! Preview rendering.
//!
//! Substitutes user-entered placeholder values into header, body and
//! button text for display. Unresolved tokens are left as their literal
//! `{{...}}` form; rendering never fails.

use super::tokens::{self, TextSegment};
use crate::{
    consts,
    models::template::{Button, HeaderComponent, HeaderFormat, MessageTemplate},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Replaces every token of `raw` whose key (`<prefix>_param_<K>`) holds a
/// non-empty value; everything else stays literal.
pub fn render_text(raw: &str, prefix: &str, placeholders: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(raw.len());

    for segment in tokens::split_segments(raw) {
        match segment {
            TextSegment::Literal { text } => rendered.push_str(&text),
            TextSegment::Token { text } => {
                let inner = text
                    .trim_start_matches("{{")
                    .trim_end_matches("}}");
                let key = tokens::placeholder_key(prefix, inner);

                match placeholders.get(&key).filter(|value| !value.is_empty()) {
                    Some(value) => rendered.push_str(value),
                    None => rendered.push_str(&text),
                }
            }
        }
    }

    rendered
}

/// Resolves the media URL of a media header.
///
/// Priority: user-supplied `header_media_url` placeholder, then the
/// template's `example.header_handle[0]`, then a synthesized placeholder URL
/// keyed by the header format.
pub fn resolve_media_url(
    header: &HeaderComponent,
    placeholders: &BTreeMap<String, String>,
) -> String {
    if let Some(value) = placeholders
        .get(consts::HEADER_MEDIA_URL_KEY)
        .filter(|value| !value.is_empty())
    {
        return value.clone();
    }

    if let Some(handle) = header
        .example
        .as_ref()
        .and_then(|example| example.header_handle.first())
    {
        return handle.clone();
    }

    let file = header
        .format
        .map(|format| format.fallback_file())
        .unwrap_or("img.png");
    format!("https://example.com/{file}")
}

/// Rendered header, either resolved text or a media URL
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderPreview {
    Text {
        text: String,
        segments: Vec<TextSegment>,
    },
    Media {
        format: String,
        url: String,
    },
}

/// Rendered body text plus its unresolved-token boundaries
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BodyPreview {
    pub text: String,
    pub segments: Vec<TextSegment>,
}

/// One rendered button row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ButtonPreview {
    pub kind: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// The whole rendered template
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplatePreview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyPreview>,
    pub buttons: Vec<ButtonPreview>,
}

/// Renders `template` with the supplied placeholder values.
///
/// The `segments` carried along with the rendered text let a display layer
/// visually distinguish tokens that are still unresolved.
pub fn render_preview(
    template: &MessageTemplate,
    placeholders: &BTreeMap<String, String>,
) -> TemplatePreview {
    let header = template.header().and_then(|header| match header.format {
        Some(format) if format.is_media() => Some(HeaderPreview::Media {
            format: format.to_string(),
            url: resolve_media_url(header, placeholders),
        }),
        Some(HeaderFormat::Text) => header.text.as_ref().map(|text| {
            let rendered = render_text(text, "header", placeholders);
            HeaderPreview::Text {
                segments: tokens::split_segments(&rendered),
                text: rendered,
            }
        }),
        _ => None,
    });

    let body = template.body().and_then(|body| {
        body.text.as_ref().map(|text| {
            let rendered = render_text(text, "body", placeholders);
            BodyPreview {
                segments: tokens::split_segments(&rendered),
                text: rendered,
            }
        })
    });

    let buttons = template
        .buttons()
        .iter()
        .enumerate()
        .filter(|(_, button)| !matches!(button, Button::Unsupported))
        .map(|(index, button)| {
            let prefix = format!("button_{index}");
            let render = |raw: &str| render_text(raw, &prefix, placeholders);

            let (url, phone_number) = match button {
                Button::Url { url, .. } => (url.as_deref().map(render), None),
                Button::PhoneNumber { phone_number, .. } => {
                    (None, phone_number.as_deref().map(render))
                }
                _ => (None, None),
            };

            ButtonPreview {
                kind: button.kind().to_string(),
                text: button.text().map(render).unwrap_or_default(),
                url,
                phone_number,
            }
        })
        .collect();

    TemplatePreview {
        header,
        body,
        buttons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::{
        BodyComponent, ButtonsComponent, Component, HeaderExample, HeaderFormat,
    };

    fn placeholders(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_render_text_round_trip() {
        let values = placeholders(&[("body_param_1", "Alice"), ("body_param_2", "9910")]);
        assert_eq!(
            render_text("Hi {{1}}, your code is {{2}}", "body", &values),
            "Hi Alice, your code is 9910"
        );
    }

    #[test]
    fn test_render_text_is_idempotent_once_resolved() {
        let values = placeholders(&[("body_param_1", "Alice")]);
        let once = render_text("Hi {{1}}", "body", &values);
        assert_eq!(render_text(&once, "body", &values), once);
    }

    #[test]
    fn test_render_text_leaves_unresolved_tokens_literal() {
        let values = placeholders(&[("body_param_1", "")]);
        assert_eq!(
            render_text("Hi {{1}} and {{2}}", "body", &values),
            "Hi {{1}} and {{2}}"
        );
    }

    #[test]
    fn test_render_named_tokens() {
        let values = placeholders(&[("header_param_first_name", "Ana")]);
        assert_eq!(render_text("Hola {{first_name}}", "header", &values), "Hola Ana");
    }

    #[test]
    fn test_resolve_media_url_priority() {
        let header = HeaderComponent {
            format: Some(HeaderFormat::Document),
            text: None,
            example: Some(HeaderExample {
                header_handle: vec!["https://cdn.example/handbook.pdf".to_string()],
            }),
        };

        let user_supplied = placeholders(&[("header_media_url", "https://x.com/a.pdf")]);
        assert_eq!(resolve_media_url(&header, &user_supplied), "https://x.com/a.pdf");

        assert_eq!(
            resolve_media_url(&header, &BTreeMap::new()),
            "https://cdn.example/handbook.pdf"
        );

        let bare = HeaderComponent {
            format: Some(HeaderFormat::Document),
            text: None,
            example: None,
        };
        assert_eq!(resolve_media_url(&bare, &BTreeMap::new()), "https://example.com/doc.pdf");
    }

    #[test]
    fn test_render_preview_marks_unresolved_segments() {
        let template = MessageTemplate {
            components: vec![Component::Body(BodyComponent {
                text: Some("Hi {{1}}, code {{2}}".to_string()),
            })],
            ..MessageTemplate::default()
        };

        let preview = render_preview(&template, &placeholders(&[("body_param_1", "Bob")]));
        let body = preview.body.unwrap();
        assert_eq!(body.text, "Hi Bob, code {{2}}");
        assert!(body.segments.contains(&TextSegment::Token {
            text: "{{2}}".to_string()
        }));
    }

    #[test]
    fn test_render_preview_buttons() {
        let template = MessageTemplate {
            components: vec![Component::Buttons(ButtonsComponent {
                buttons: vec![
                    Button::Url {
                        text: Some("Track".to_string()),
                        url: Some("https://x.com/{{1}}".to_string()),
                    },
                    Button::PhoneNumber {
                        text: Some("Call us".to_string()),
                        phone_number: Some("+15550001111".to_string()),
                    },
                ],
            })],
            ..MessageTemplate::default()
        };

        let preview = render_preview(&template, &placeholders(&[("button_0_param_1", "abc")]));
        assert_eq!(preview.buttons.len(), 2);
        assert_eq!(preview.buttons[0].url.as_deref(), Some("https://x.com/abc"));
        assert_eq!(preview.buttons[1].phone_number.as_deref(), Some("+15550001111"));
    }
}
