//! Playground form state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole playground form state.
///
/// Created once with defaults, then mutated field by field as the user
/// works through the selection chain. Selections invalidate strictly
/// parent-to-child: business -> account -> template -> placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub access_token: String,
    pub recipient_phone: String,
    pub selected_business: String,
    pub selected_waba: String,
    pub selected_template: String,
    /// Flat placeholder mapping, keyed `header_param_*` / `body_param_*` /
    /// `button_{i}_param_*` / `header_media_url`
    pub template_placeholders: BTreeMap<String, String>,
    pub waba_id: String,
    pub phone_number_id: String,
    pub is_session_message: bool,
    pub session_message_text: String,
    pub session_message_preview_url: bool,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        PlaygroundConfig {
            access_token: String::new(),
            recipient_phone: "+".to_string(),
            selected_business: String::new(),
            selected_waba: String::new(),
            selected_template: String::new(),
            template_placeholders: BTreeMap::new(),
            waba_id: String::new(),
            phone_number_id: String::new(),
            is_session_message: false,
            session_message_text: String::new(),
            session_message_preview_url: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recipient_phone() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.recipient_phone, "+");
        assert!(config.template_placeholders.is_empty());
        assert!(!config.is_session_message);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: PlaygroundConfig =
            serde_json::from_str(r#"{"recipient_phone": "+14155552671"}"#).unwrap();
        assert_eq!(config.recipient_phone, "+14155552671");
        assert_eq!(config.selected_template, "");
    }
}
