use serde::{Deserialize, Serialize};

use crate::models::{parameter::ParameterInput, template::TemplateButton};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParameter {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
}

impl TextParameter {
    pub fn positional(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
            parameter_name: None,
        }
    }

    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
            parameter_name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub parameters: Vec<TextParameter>,
}

/// Body of `POST /send-whatsapp-template`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingRequest {
    pub to: String,
    pub template_name: String,
    pub language_code: String,
    pub components: Vec<RequestComponent>,
}

/// What a caller submits to the console before validation and assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTemplateForm {
    pub to: String,
    pub template_name: String,

    #[serde(default)]
    pub language_code: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateExample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponent {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<CreateExample>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<TemplateButton>>,
}

impl CreateComponent {
    pub fn text(kind: &str, text: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            format: Some("TEXT".to_string()),
            text: Some(text.into()),
            example: None,
            buttons: None,
        }
    }
}

/// Body of `POST /templates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCreateRequest {
    pub name: String,
    pub language: String,
    pub category: String,

    #[serde(default)]
    pub allow_category_change: bool,

    pub components: Vec<CreateComponent>,
}

/// Body of `POST /send-whatsapp-message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyMessageRequest {
    pub phone_number: String,
    pub message: String,

    #[serde(default = "default_language_code")]
    pub language_code: String,
}

fn default_language_code() -> String {
    "en_US".to_string()
}

impl LegacyMessageRequest {
    pub fn new(phone_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            message: message.into(),
            language_code: default_language_code(),
        }
    }
}

/// Body of `POST /send-sms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsRequest {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub message: String,
}
