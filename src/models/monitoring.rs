use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLog {
    pub id: Value,
    pub timestamp: String,
    pub method: String,
    pub path: String,

    #[serde(default)]
    pub query: Option<String>,

    #[serde(default, alias = "clientIp")]
    pub client_ip: Option<String>,

    #[serde(alias = "statusCode")]
    pub status_code: u16,

    #[serde(alias = "durationMs")]
    pub duration_ms: f64,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogsResponse {
    #[serde(default)]
    pub requests: Vec<RequestLog>,
}
