use anyhow::{Error, Result, anyhow};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    errors::SenderError,
    models::{
        message::{MessageRecord, MessagesResponse},
        monitoring::{RequestLog, RequestLogsResponse},
        request::{LegacyMessageRequest, OutgoingRequest, SmsRequest, TemplateCreateRequest},
        template::{Template, TemplatesResponse},
    },
};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the messaging backend. One method per endpoint, no retries.
#[derive(Clone)]
pub struct BackendClient {
    http_client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        let base_url = Url::parse(config.api_base_url.trim_end_matches('/'))
            .map_err(|e| anyhow!("Invalid API base URL '{}': {}", config.api_base_url, e))?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL '{}' cannot be a base", config.api_base_url));
        }

        info!(base_url = %base_url, "Backend client initialized");

        Ok(Self {
            http_client,
            base_url,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }

    pub async fn send_template(&self, request: &OutgoingRequest) -> Result<Value, SenderError> {
        debug!(
            template_name = %request.template_name,
            language_code = %request.language_code,
            "Sending template message"
        );

        let url = self.endpoint(&["send-whatsapp-template"]);
        self.execute(
            self.http_client.post(url).json(request),
            "Failed to send WhatsApp template",
        )
        .await
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, SenderError> {
        let url = self.endpoint(&["templates"]);
        let response: TemplatesResponse = self
            .execute(self.http_client.get(url), "Failed to fetch templates")
            .await?;

        debug!(template_count = response.templates.len(), "Fetched templates");
        Ok(response.templates)
    }

    pub async fn create_template(
        &self,
        request: &TemplateCreateRequest,
    ) -> Result<Value, SenderError> {
        debug!(name = %request.name, language = %request.language, "Creating template");

        let url = self.endpoint(&["templates"]);
        self.execute(
            self.http_client.post(url).json(request),
            "Failed to create template",
        )
        .await
    }

    pub async fn list_messages(&self) -> Result<Vec<MessageRecord>, SenderError> {
        let url = self.endpoint(&["messages"]);
        let response: MessagesResponse = self
            .execute(self.http_client.get(url), "Failed to fetch messages")
            .await?;

        Ok(response
            .messages
            .into_iter()
            .map(MessageRecord::from)
            .collect())
    }

    pub async fn send_message(&self, request: &LegacyMessageRequest) -> Result<Value, SenderError> {
        let url = self.endpoint(&["send-whatsapp-message"]);
        self.execute(
            self.http_client.post(url).json(request),
            "Failed to send message",
        )
        .await
    }

    pub async fn message_status(&self, message_id: &str) -> Result<Value, SenderError> {
        let url = self.endpoint(&["message-status", message_id]);
        self.execute(
            self.http_client.get(url),
            "Failed to retrieve message status",
        )
        .await
    }

    pub async fn all_message_statuses(&self) -> Result<Value, SenderError> {
        let url = self.endpoint(&["all-message-statuses"]);
        self.execute(
            self.http_client.get(url),
            "Failed to retrieve all message statuses",
        )
        .await
    }

    pub async fn request_logs(&self) -> Result<Vec<RequestLog>, SenderError> {
        let url = self.endpoint(&["monitoring", "requests"]);
        let response: RequestLogsResponse = self
            .execute(self.http_client.get(url), "Failed to fetch request logs")
            .await?;

        Ok(response.requests)
    }

    pub async fn send_sms(&self, request: &SmsRequest) -> Result<Value, SenderError> {
        let url = self.endpoint(&["send-sms"]);
        self.execute(self.http_client.post(url).json(request), "Failed to send SMS")
            .await
    }

    /// Hits the backend root; any 2xx counts as reachable.
    pub async fn ping(&self) -> Result<(), SenderError> {
        let url = self.endpoint(&[]);
        let _: Value = self
            .execute(self.http_client.get(url), "Backend is unreachable")
            .await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if segments.is_empty() {
            return url;
        }
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute<T>(&self, request: RequestBuilder, fallback: &str) -> Result<T, SenderError>
    where
        T: DeserializeOwned,
    {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Backend request failed");
            SenderError::transport(fallback)
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Backend returned error status");
            return Err(SenderError::transport(error_detail(&body, fallback)));
        }

        let body = response.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read backend response body");
            SenderError::transport(fallback)
        })?;

        // Some endpoints answer 2xx with an empty body.
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };

        serde_json::from_str::<T>(body).map_err(|e| {
            warn!(error = %e, "Failed to decode backend response");
            SenderError::Decode(format!("{}: unexpected response from backend", fallback))
        })
    }
}

/// The upstream `detail` field when present, `fallback` otherwise.
pub fn error_detail(body: &str, fallback: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("detail").map(Value::take));

    match detail {
        Some(Value::String(detail)) if !detail.is_empty() => detail,
        Some(Value::Null) | Some(Value::String(_)) | None => fallback.to_string(),
        Some(other) => other.to_string(),
    }
}
