use anyhow::Result;
use messaging_console::{
    clients::backend::{BackendClient, error_detail},
    config::Config,
    errors::SenderError,
    models::request::{LegacyMessageRequest, OutgoingRequest, SmsRequest},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

use crate::fixtures::{body_template, client_for, templates_body};

fn hello_world_request() -> OutgoingRequest {
    OutgoingRequest {
        to: "15551234567".to_string(),
        template_name: "hello_world".to_string(),
        language_code: "en_US".to_string(),
        components: Vec::new(),
    }
}

/// Test: Template send posts the request body and returns the raw response
#[tokio::test]
async fn test_send_template_success() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-whatsapp-template"))
        .and(body_json(json!({
            "to": "15551234567",
            "template_name": "hello_world",
            "language_code": "en_US",
            "components": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "messages": [{ "id": "wamid.abc" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let response = client.send_template(&hello_world_request()).await?;

    assert_eq!(response["messages"][0]["id"], "wamid.abc");

    Ok(())
}

/// Test: Upstream detail is surfaced verbatim on error
#[tokio::test]
async fn test_send_template_error_detail() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-whatsapp-template"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Facebook API Error: {'error': {'message': 'Invalid parameter'}}"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let err = client
        .send_template(&hello_world_request())
        .await
        .expect_err("should fail");

    assert_eq!(
        err,
        SenderError::transport("Facebook API Error: {'error': {'message': 'Invalid parameter'}}")
    );

    Ok(())
}

/// Test: Errors without detail use the fixed fallback message
#[tokio::test]
async fn test_send_template_error_fallback() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-whatsapp-template"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let err = client
        .send_template(&hello_world_request())
        .await
        .expect_err("should fail");

    assert_eq!(err.to_string(), "Failed to send WhatsApp template");

    Ok(())
}

/// Test: Unreachable backend maps to the fallback message
#[tokio::test]
async fn test_network_failure_uses_fallback() -> Result<()> {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = client_for(&uri);
    let err = client.list_templates().await.expect_err("should fail");

    assert_eq!(err, SenderError::transport("Failed to fetch templates"));

    Ok(())
}

/// Test: Detail extraction handles strings, structures and absence
#[test]
fn test_error_detail_shapes() -> Result<()> {
    assert_eq!(error_detail(r#"{"detail":"Invalid API key"}"#, "fallback"), "Invalid API key");
    assert_eq!(
        error_detail(r#"{"detail":[{"loc":["body","to"]}]}"#, "fallback"),
        r#"[{"loc":["body","to"]}]"#
    );
    assert_eq!(error_detail(r#"{"detail":null}"#, "fallback"), "fallback");
    assert_eq!(error_detail(r#"{"error":"nope"}"#, "fallback"), "fallback");
    assert_eq!(error_detail("<html>", "fallback"), "fallback");

    Ok(())
}

/// Test: Template listing decodes the templates envelope
#[tokio::test]
async fn test_list_templates() -> Result<()> {
    let server = MockServer::start().await;
    let templates = vec![
        body_template("hello_world", "en_US", "Hello World"),
        body_template("greeting", "es", "Hola {{1}}"),
    ];

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(templates_body(&templates)))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let fetched = client.list_templates().await?;

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[1].name, "greeting");
    assert_eq!(fetched[1].language, "es");

    Ok(())
}

/// Test: Configured API key is sent on every request
#[tokio::test]
async fn test_api_key_header_sent() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all-message-statuses"))
        .and(header("X-API-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "statuses": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::for_base_url(server.uri());
    config.api_key = Some("secret-key".to_string());
    let client = BackendClient::new(&config)?;

    let response = client.all_message_statuses().await?;
    assert_eq!(response, json!({ "statuses": [] }));

    Ok(())
}

/// Test: Base URL path prefixes are preserved and ids are path-encoded
#[tokio::test]
async fn test_endpoint_paths() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/message-status/wamid%2F42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "delivered" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&format!("{}/api/", server.uri()));
    let response = client.message_status("wamid/42").await?;

    assert_eq!(response["status"], "delivered");

    Ok(())
}

/// Test: Legacy message, SMS and monitoring endpoints use their paths
#[tokio::test]
async fn test_legacy_endpoints() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-whatsapp-message"))
        .and(body_json(json!({
            "phone_number": "15551234567",
            "message": "hi",
            "language_code": "en_US"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message_id": "m1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/send-sms"))
        .and(body_json(json!({ "phoneNumber": "+15551234567", "message": "hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "messageId": "sns-1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/monitoring/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requests": [{
                "id": "r1",
                "timestamp": "2025-03-01T10:00:00Z",
                "method": "GET",
                "path": "/templates",
                "status_code": 200,
                "duration_ms": 4
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());

    let sent = client
        .send_message(&LegacyMessageRequest::new("15551234567", "hi"))
        .await?;
    assert_eq!(sent["message_id"], "m1");

    let sms = client
        .send_sms(&SmsRequest {
            phone_number: "+15551234567".to_string(),
            message: "hi".to_string(),
        })
        .await?;
    assert_eq!(sms["messageId"], "sns-1");

    let logs = client.request_logs().await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].path, "/templates");

    Ok(())
}

/// Test: Message list with a malformed row still loads
#[tokio::test]
async fn test_list_messages_tolerates_bad_content() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                { "message_content": "{\"text\":{\"body\":\"ok\"}}", "contact_info": "{}" },
                { "message_content": "oops", "contact_info": "also oops" }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let messages = client.list_messages().await?;

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text_body(), Some("ok"));
    assert_eq!(messages[1].text_body(), None);

    Ok(())
}
