//! # Message Template Schemas
//!
//! Data structures describing a pre-approved WhatsApp Business message
//! template: a named, language-tagged layout made of header/body/buttons
//! components whose text may carry `{{n}}` or `{{name}}` placeholder tokens.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Template category assigned by the provider at review time
#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    #[display("marketing")]
    Marketing,
    #[default]
    #[display("utility")]
    Utility,
    #[display("authentication")]
    Authentication,
    /// Categories this widget has no special handling for
    #[display("other")]
    Other,
}

impl From<String> for TemplateCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "MARKETING" => TemplateCategory::Marketing,
            "UTILITY" => TemplateCategory::Utility,
            "AUTHENTICATION" => TemplateCategory::Authentication,
            _ => TemplateCategory::Other,
        }
    }
}

/// Header content format
#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum HeaderFormat {
    #[display("text")]
    Text,
    #[display("image")]
    Image,
    #[display("video")]
    Video,
    #[display("document")]
    Document,
    /// Formats this widget has no special handling for (e.g. LOCATION)
    #[display("other")]
    Other,
}

impl From<String> for HeaderFormat {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "TEXT" => HeaderFormat::Text,
            "IMAGE" => HeaderFormat::Image,
            "VIDEO" => HeaderFormat::Video,
            "DOCUMENT" => HeaderFormat::Document,
            _ => HeaderFormat::Other,
        }
    }
}

impl HeaderFormat {
    /// Media headers supply their content through a URL instead of text
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            HeaderFormat::Image | HeaderFormat::Video | HeaderFormat::Document
        )
    }

    /// File name used when synthesizing a fallback media URL
    pub fn fallback_file(&self) -> &'static str {
        match self {
            HeaderFormat::Video => "vid.mp4",
            HeaderFormat::Document => "doc.pdf",
            _ => "img.png",
        }
    }
}

/// Sample values the provider attaches to a template definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderExample {
    /// Default media URLs for media headers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_handle: Vec<String>,
}

/// Header component of a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<HeaderFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<HeaderExample>,
}

/// Body component of a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Buttons component of a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ButtonsComponent {
    #[serde(default)]
    pub buttons: Vec<Button>,
}

/// Template component, tagged by its structural type.
///
/// A template carries at most one of each structural type; that is a
/// provider constraint and is not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Component {
    #[serde(rename = "HEADER")]
    Header(HeaderComponent),
    #[serde(rename = "BODY")]
    Body(BodyComponent),
    #[serde(rename = "BUTTONS")]
    Buttons(ButtonsComponent),
    /// Component types the playground does not interact with (e.g. FOOTER)
    #[serde(other)]
    Unsupported,
}

/// Template button, tagged by its sub-kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Button {
    Url {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    PhoneNumber {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        phone_number: Option<String>,
    },
    QuickReply {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    CopyCode {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Flow {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        flow_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        flow_action: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        navigate_screen: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl Button {
    pub fn kind(&self) -> &'static str {
        match self {
            Button::Url { .. } => "URL",
            Button::PhoneNumber { .. } => "PHONE_NUMBER",
            Button::QuickReply { .. } => "QUICK_REPLY",
            Button::CopyCode { .. } => "COPY_CODE",
            Button::Flow { .. } => "FLOW",
            Button::Unsupported => "UNSUPPORTED",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Button::Url { text, .. }
            | Button::PhoneNumber { text, .. }
            | Button::QuickReply { text }
            | Button::CopyCode { text }
            | Button::Flow { text, .. } => text.as_deref(),
            Button::Unsupported => None,
        }
    }
}

/// A named, versioned, language-tagged message layout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageTemplate {
    pub id: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: TemplateCategory,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl MessageTemplate {
    pub fn header(&self) -> Option<&HeaderComponent> {
        self.components.iter().find_map(|component| match component {
            Component::Header(header) => Some(header),
            _ => None,
        })
    }

    pub fn body(&self) -> Option<&BodyComponent> {
        self.components.iter().find_map(|component| match component {
            Component::Body(body) => Some(body),
            _ => None,
        })
    }

    pub fn buttons(&self) -> &[Button] {
        self.components
            .iter()
            .find_map(|component| match component {
                Component::Buttons(buttons) => Some(buttons.buttons.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Format of the header component, if any
    pub fn media_type(&self) -> Option<HeaderFormat> {
        self.header().and_then(|header| header.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_deserialization() {
        let raw = r#"{
            "id": "1203",
            "name": "order_update",
            "language": "en_US",
            "status": "APPROVED",
            "category": "UTILITY",
            "components": [
                {"type": "HEADER", "format": "TEXT", "text": "Order {{1}}"},
                {"type": "BODY", "text": "Hi {{1}}, your order shipped."},
                {"type": "FOOTER", "text": "Reply STOP to opt out"},
                {"type": "BUTTONS", "buttons": [
                    {"type": "URL", "text": "Track", "url": "https://shop.example/track/{{1}}"},
                    {"type": "QUICK_REPLY", "text": "Ok"}
                ]}
            ]
        }"#;

        let template: MessageTemplate = serde_json::from_str(raw).unwrap();
        assert_eq!(template.category, TemplateCategory::Utility);
        assert_eq!(template.components.len(), 4);
        assert_eq!(template.header().unwrap().format, Some(HeaderFormat::Text));
        assert!(matches!(template.components[2], Component::Unsupported));
        assert_eq!(template.buttons().len(), 2);
        assert_eq!(template.buttons()[0].kind(), "URL");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let raw = r#"{"id": "9", "name": "x", "language": "en", "category": "CAROUSEL"}"#;
        let template: MessageTemplate = serde_json::from_str(raw).unwrap();
        assert_eq!(template.category, TemplateCategory::Other);
    }

    #[test]
    fn test_media_type_reads_header_format() {
        let template = MessageTemplate {
            components: vec![Component::Header(HeaderComponent {
                format: Some(HeaderFormat::Image),
                text: None,
                example: None,
            })],
            ..MessageTemplate::default()
        };
        assert_eq!(template.media_type(), Some(HeaderFormat::Image));
        assert!(template.media_type().unwrap().is_media());
    }
}
