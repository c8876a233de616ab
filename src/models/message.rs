use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A nested field the backend stores as a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DecodedField {
    Json(Value),
    Raw(String),
}

impl DecodedField {
    pub fn decode(encoded: &str) -> Self {
        match serde_json::from_str::<Value>(encoded) {
            Ok(value) => DecodedField::Json(value),
            Err(_) => DecodedField::Raw(encoded.to_string()),
        }
    }

    /// Normalizes a field that may already be an object instead of a string.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(encoded) => Self::decode(&encoded),
            other => DecodedField::Json(other),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedField::Json(value) => Some(value),
            DecodedField::Raw(_) => None,
        }
    }
}

/// Row as returned by `GET /messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub from_number: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub message_content: Value,
    #[serde(default)]
    pub contact_info: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub id: Option<Value>,
    pub message_id: Option<String>,
    pub from_number: Option<String>,
    pub timestamp: Option<String>,
    pub message_type: Option<String>,
    pub message_content: DecodedField,
    pub contact_info: DecodedField,
}

impl MessageRecord {
    /// Text body of a text message, when the content decoded cleanly.
    pub fn text_body(&self) -> Option<&str> {
        self.message_content
            .as_json()?
            .get("text")?
            .get("body")?
            .as_str()
    }

    pub fn contact_name(&self) -> Option<&str> {
        self.contact_info
            .as_json()?
            .get("profile")?
            .get("name")?
            .as_str()
    }
}

impl From<MessageResponse> for MessageRecord {
    fn from(response: MessageResponse) -> Self {
        Self {
            id: response.id,
            message_id: response.message_id,
            from_number: response.from_number,
            timestamp: response.timestamp,
            message_type: response.message_type,
            message_content: DecodedField::from_value(response.message_content),
            contact_info: DecodedField::from_value(response.contact_info),
        }
    }
}

/// Latest view of the message list held by the poller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessagesSnapshot {
    pub messages: Vec<MessageRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}
