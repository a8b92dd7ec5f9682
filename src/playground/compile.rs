//! Request-body compilation.
//!
//! Builds the JSON payload a test call sends, in one of two wire shapes:
//! the Facebook Graph API shape (`messaging_product`/`language.code`) or
//! the generic gateway shape (`from`/`lang_code`). Structures follow the
//! provider's message-send schema; only components with dynamic values are
//! emitted.

use super::{render, tokens};
use crate::{
    consts,
    models::{
        account::AccountOption,
        playground::PlaygroundConfig,
        template::{Button, Component, HeaderFormat, MessageTemplate},
    },
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Which backend API shape to compile for
#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiTarget {
    #[display("facebook")]
    #[serde(alias = "facebook", rename(serialize = "facebook"))]
    Facebook,
    #[display("sendzen")]
    #[serde(alias = "sendzen", rename(serialize = "sendzen"))]
    SendZen,
}

/// One value inside a component parameter group
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Parameter {
    Text {
        text: String,
        /// Present only for named tokens
        #[serde(skip_serializing_if = "Option::is_none")]
        parameter_name: Option<String>,
    },
    Image {
        image: MediaLink,
    },
    Video {
        video: MediaLink,
    },
    Document {
        document: MediaLink,
    },
    Action {
        action: FlowAction,
    },
}

/// Media reference sent for media headers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MediaLink {
    pub link: String,
}

/// Action payload of a flow button
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlowAction {
    pub flow_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_action_data: Option<Value>,
}

/// One parameter group of the `template.components` array
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentParams {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub parameters: Vec<Parameter>,
}

/// Template object in the Graph API shape
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphTemplateObject {
    pub name: String,
    pub language: LanguageCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentParams>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LanguageCode {
    pub code: String,
}

/// Template object in the gateway shape; the language object is flattened
/// into `lang_code`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayTemplateObject {
    pub name: String,
    pub lang_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentParams>>,
}

/// Template message to send through the Graph API
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphTemplateMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub template: GraphTemplateObject,
}

impl GraphTemplateMessage {
    pub fn new(to: String, template: GraphTemplateObject) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to,
            msg_type: "template".to_string(),
            template,
        }
    }
}

/// Template message to send through the generic gateway
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayTemplateMessage {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub template: GatewayTemplateObject,
}

impl GatewayTemplateMessage {
    pub fn new(from: String, to: String, template: GatewayTemplateObject) -> Self {
        Self {
            from,
            to,
            msg_type: "template".to_string(),
            template,
        }
    }
}

/// Free-text session message in the Graph API shape
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphTextMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: TextContent,
}

impl GraphTextMessage {
    pub fn new(to: String, body: String) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to,
            msg_type: "text".to_string(),
            text: TextContent { body },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextContent {
    pub body: String,
}

/// Free-text session message in the gateway shape
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayTextMessage {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: GatewayTextContent,
}

impl GatewayTextMessage {
    pub fn new(from: String, to: String, body: String, preview_url: bool) -> Self {
        Self {
            from,
            to,
            msg_type: "text".to_string(),
            text: GatewayTextContent { body, preview_url },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayTextContent {
    pub body: String,
    pub preview_url: bool,
}

/// A compiled request body in either wire shape
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RequestBody {
    GraphTemplate(GraphTemplateMessage),
    GatewayTemplate(GatewayTemplateMessage),
    GraphText(GraphTextMessage),
    GatewayText(GatewayTextMessage),
}

fn text_parameters(
    text: &str,
    prefix: &str,
    placeholders: &BTreeMap<String, String>,
) -> Vec<Parameter> {
    tokens::scan_tokens(text)
        .into_iter()
        .map(|token| {
            let key = tokens::placeholder_key(prefix, &token.inner);
            let value = placeholders
                .get(&key)
                .filter(|value| !value.is_empty())
                .cloned()
                .unwrap_or_else(|| token.literal());

            Parameter::Text {
                text: value,
                parameter_name: (!token.positional).then(|| token.inner.clone()),
            }
        })
        .collect()
}

fn media_parameter(format: HeaderFormat, link: String) -> Option<Parameter> {
    let media = MediaLink { link };

    match format {
        HeaderFormat::Image => Some(Parameter::Image { image: media }),
        HeaderFormat::Video => Some(Parameter::Video { video: media }),
        HeaderFormat::Document => Some(Parameter::Document { document: media }),
        _ => None,
    }
}

fn button_text_parameter(
    field: &str,
    index: usize,
    placeholders: &BTreeMap<String, String>,
) -> Option<Parameter> {
    let token = tokens::first_token(field)?;
    let key = tokens::placeholder_key(&format!("button_{index}"), &token.inner);
    let value = placeholders
        .get(&key)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| consts::BUTTON_PARAM_FALLBACK.to_string());

    Some(Parameter::Text {
        text: value,
        parameter_name: (!token.positional).then(|| token.inner),
    })
}

fn flow_button_action(
    index: usize,
    flow_id: &Option<String>,
    flow_action: &Option<String>,
    navigate_screen: &Option<String>,
    placeholders: &BTreeMap<String, String>,
) -> FlowAction {
    let flow_token = placeholders
        .get(&format!("button_{index}_flow_token"))
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| consts::FLOW_TOKEN_DEFAULT.to_string());

    let data_key = format!("button_{index}_flow_action_data");
    let flow_action_data = match placeholders.get(&data_key).filter(|value| !value.is_empty()) {
        // user-supplied JSON wins; unparseable input degrades to {}
        Some(raw) => Some(serde_json::from_str::<Value>(raw).unwrap_or_else(|_| json!({}))),
        None => {
            if flow_id.is_some() || flow_action.is_some() || navigate_screen.is_some() {
                let mut data = serde_json::Map::new();
                if let Some(id) = flow_id {
                    data.insert("flow_id".to_string(), json!(id));
                }
                if let Some(action) = flow_action {
                    data.insert("flow_action".to_string(), json!(action));
                }
                if let Some(screen) = navigate_screen {
                    data.insert("navigate_screen".to_string(), json!(screen));
                }
                Some(Value::Object(data))
            } else {
                None
            }
        }
    };

    FlowAction {
        flow_token,
        flow_action_data,
    }
}

/// Compiles the `template.components` parameter groups, in declaration
/// order. Components without dynamic values produce no entry.
///
/// `PHONE_NUMBER` and `QUICK_REPLY` buttons are never emitted; the
/// provider handles both without request parameters.
pub fn compile_template_components(
    template: &MessageTemplate,
    placeholders: &BTreeMap<String, String>,
) -> Vec<ComponentParams> {
    let mut components = Vec::new();

    for component in &template.components {
        match component {
            Component::Header(header) => {
                if header.format == Some(HeaderFormat::Text) {
                    if let Some(text) = &header.text {
                        let parameters = text_parameters(text, "header", placeholders);
                        if !parameters.is_empty() {
                            components.push(ComponentParams {
                                kind: "header".to_string(),
                                sub_type: None,
                                index: None,
                                parameters,
                            });
                        }
                    }
                } else if let Some(format) = header.format.filter(|format| format.is_media()) {
                    let link = render::resolve_media_url(header, placeholders);
                    if let Some(parameter) = media_parameter(format, link) {
                        components.push(ComponentParams {
                            kind: "header".to_string(),
                            sub_type: None,
                            index: None,
                            parameters: vec![parameter],
                        });
                    }
                }
            }
            Component::Body(body) => {
                if let Some(text) = &body.text {
                    let parameters = text_parameters(text, "body", placeholders);
                    if !parameters.is_empty() {
                        components.push(ComponentParams {
                            kind: "body".to_string(),
                            sub_type: None,
                            index: None,
                            parameters,
                        });
                    }
                }
            }
            Component::Buttons(buttons) => {
                for (index, button) in buttons.buttons.iter().enumerate() {
                    match button {
                        Button::Url { url: Some(url), .. } => {
                            if let Some(parameter) =
                                button_text_parameter(url, index, placeholders)
                            {
                                components.push(ComponentParams {
                                    kind: "button".to_string(),
                                    sub_type: Some("url".to_string()),
                                    index: Some(index),
                                    parameters: vec![parameter],
                                });
                            }
                        }
                        Button::CopyCode { text: Some(text) } => {
                            if let Some(parameter) =
                                button_text_parameter(text, index, placeholders)
                            {
                                components.push(ComponentParams {
                                    kind: "button".to_string(),
                                    sub_type: Some("copy_code".to_string()),
                                    index: Some(index),
                                    parameters: vec![parameter],
                                });
                            }
                        }
                        Button::Flow {
                            flow_id,
                            flow_action,
                            navigate_screen,
                            ..
                        } => {
                            let action = flow_button_action(
                                index,
                                flow_id,
                                flow_action,
                                navigate_screen,
                                placeholders,
                            );
                            components.push(ComponentParams {
                                kind: "button".to_string(),
                                sub_type: Some("flow".to_string()),
                                index: Some(index),
                                parameters: vec![Parameter::Action { action }],
                            });
                        }
                        // PHONE_NUMBER and QUICK_REPLY are dialed/answered
                        // client-side; the API takes no parameters for them
                        _ => {}
                    }
                }
            }
            Component::Unsupported => {}
        }
    }

    components
}

fn resolve_sender_phone(config: &PlaygroundConfig, accounts: &[AccountOption]) -> String {
    accounts
        .iter()
        .find(|option| option.value == config.selected_waba)
        .map(|option| option.phone.clone())
        .filter(|phone| !phone.is_empty())
        .unwrap_or_else(|| consts::FALLBACK_SENDER_PHONE.to_string())
}

/// Compiles the template-message body for a resolved template
pub fn compile_template_request_body(
    config: &PlaygroundConfig,
    template: &MessageTemplate,
    accounts: &[AccountOption],
    target: ApiTarget,
) -> RequestBody {
    let components = compile_template_components(template, &config.template_placeholders);
    let components = (!components.is_empty()).then_some(components);

    match target {
        ApiTarget::Facebook => RequestBody::GraphTemplate(GraphTemplateMessage::new(
            config.recipient_phone.clone(),
            GraphTemplateObject {
                name: template.name.clone(),
                language: LanguageCode {
                    code: template.language.clone(),
                },
                components,
            },
        )),
        ApiTarget::SendZen => RequestBody::GatewayTemplate(GatewayTemplateMessage::new(
            resolve_sender_phone(config, accounts),
            config.recipient_phone.clone(),
            GatewayTemplateObject {
                name: template.name.clone(),
                lang_code: template.language.clone(),
                components,
            },
        )),
    }
}

fn sample_template_body(
    config: &PlaygroundConfig,
    accounts: &[AccountOption],
    target: ApiTarget,
) -> RequestBody {
    match target {
        ApiTarget::Facebook => RequestBody::GraphTemplate(GraphTemplateMessage::new(
            config.recipient_phone.clone(),
            GraphTemplateObject {
                name: consts::SAMPLE_TEMPLATE_NAME.to_string(),
                language: LanguageCode {
                    code: consts::SAMPLE_TEMPLATE_LANG.to_string(),
                },
                components: None,
            },
        )),
        ApiTarget::SendZen => RequestBody::GatewayTemplate(GatewayTemplateMessage::new(
            resolve_sender_phone(config, accounts),
            config.recipient_phone.clone(),
            GatewayTemplateObject {
                name: consts::SAMPLE_TEMPLATE_NAME.to_string(),
                lang_code: consts::SAMPLE_TEMPLATE_LANG.to_string(),
                components: None,
            },
        )),
    }
}

/// Compiles the request body for the current form state.
///
/// Session mode emits a minimal text-message payload. Template mode
/// requires the selected template to resolve against `templates`; an
/// unresolved selection falls back to a stub `sample_template` payload
/// instead of failing.
pub fn compile_request_body(
    config: &PlaygroundConfig,
    templates: &[MessageTemplate],
    accounts: &[AccountOption],
    target: ApiTarget,
) -> RequestBody {
    if config.is_session_message {
        return match target {
            ApiTarget::Facebook => RequestBody::GraphText(GraphTextMessage::new(
                config.recipient_phone.clone(),
                config.session_message_text.clone(),
            )),
            ApiTarget::SendZen => RequestBody::GatewayText(GatewayTextMessage::new(
                resolve_sender_phone(config, accounts),
                config.recipient_phone.clone(),
                config.session_message_text.clone(),
                config.session_message_preview_url,
            )),
        };
    }

    if !config.selected_template.is_empty() {
        if let Some(template) = templates
            .iter()
            .find(|template| template.id == config.selected_template)
        {
            return compile_template_request_body(config, template, accounts, target);
        }
    }

    sample_template_body(config, accounts, target)
}
