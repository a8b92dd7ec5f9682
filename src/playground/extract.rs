//! Placeholder extraction.
//!
//! Turns a template definition into the flat placeholder mapping the
//! editing form works on. Keys follow a fixed naming convention:
//! `header_param_{K}`, `body_param_{K}`, `button_{i}_param_{K}` and the
//! `header_media_url` sentinel for media headers.

use super::tokens;
use crate::{
    consts,
    models::template::{Button, Component, MessageTemplate, TemplateCategory},
};
use std::collections::BTreeMap;

/// Extracts the placeholder keys of `template`, each mapped to an empty
/// default value.
///
/// Header and body text contribute every token they carry; button fields
/// (`URL` urls, `PHONE_NUMBER` phone numbers, `COPY_CODE` texts) contribute
/// at most their first token. A media header always contributes
/// `header_media_url`, whether or not its text carries tokens.
///
/// AUTHENTICATION templates get every non-media key pre-filled with the
/// default `"1234"`; that is a product policy for one-time-password
/// templates, not a generic rule.
pub fn extract_placeholders(template: &MessageTemplate) -> BTreeMap<String, String> {
    let mut placeholders = BTreeMap::new();
    let mut has_media_header = false;

    for component in &template.components {
        match component {
            Component::Header(header) => {
                if header.format.is_some_and(|format| format.is_media()) {
                    has_media_header = true;
                }

                if let Some(text) = &header.text {
                    for token in tokens::scan_tokens(text) {
                        placeholders
                            .insert(tokens::placeholder_key("header", &token.inner), String::new());
                    }
                }
            }
            Component::Body(body) => {
                if let Some(text) = &body.text {
                    for token in tokens::scan_tokens(text) {
                        placeholders
                            .insert(tokens::placeholder_key("body", &token.inner), String::new());
                    }
                }
            }
            Component::Buttons(buttons) => {
                for (index, button) in buttons.buttons.iter().enumerate() {
                    let field = match button {
                        Button::Url { url, .. } => url.as_deref(),
                        Button::PhoneNumber { phone_number, .. } => phone_number.as_deref(),
                        Button::CopyCode { text } => text.as_deref(),
                        _ => None,
                    };

                    if let Some(token) = field.and_then(tokens::first_token) {
                        placeholders.insert(
                            tokens::placeholder_key(&format!("button_{index}"), &token.inner),
                            String::new(),
                        );
                    }
                }
            }
            Component::Unsupported => {}
        }
    }

    if has_media_header {
        placeholders.insert(consts::HEADER_MEDIA_URL_KEY.to_string(), String::new());
    }

    if template.category == TemplateCategory::Authentication {
        for (key, value) in placeholders.iter_mut() {
            // media URLs keep their empty default even for OTP templates
            if key != consts::HEADER_MEDIA_URL_KEY {
                *value = consts::AUTH_TEMPLATE_DEFAULT_PARAM.to_string();
            }
        }
    }

    placeholders
}
