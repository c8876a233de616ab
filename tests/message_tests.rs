use anyhow::Result;
use messaging_console::models::{
    message::{DecodedField, MessageRecord, MessagesResponse},
    monitoring::RequestLogsResponse,
};
use serde_json::json;

/// Test: JSON-encoded nested fields are decoded
#[test]
fn test_nested_fields_decoded() -> Result<()> {
    let response: MessagesResponse = serde_json::from_value(json!({
        "messages": [{
            "id": 7,
            "message_id": "wamid.1",
            "from_number": "15551234567",
            "timestamp": "2025-03-01T10:00:00",
            "message_type": "text",
            "message_content": "{\"text\": {\"body\": \"hi there\"}}",
            "contact_info": "{\"profile\": {\"name\": \"Ada\"}}"
        }]
    }))?;

    let record = MessageRecord::from(response.messages[0].clone());

    assert_eq!(record.text_body(), Some("hi there"));
    assert_eq!(record.contact_name(), Some("Ada"));

    Ok(())
}

/// Test: Malformed nested JSON falls back to raw text
#[test]
fn test_malformed_nested_json_kept_raw() -> Result<()> {
    let response: MessagesResponse = serde_json::from_value(json!({
        "messages": [{
            "message_content": "{not json",
            "contact_info": "{}"
        }]
    }))?;

    let record = MessageRecord::from(response.messages[0].clone());

    assert_eq!(
        record.message_content,
        DecodedField::Raw("{not json".to_string())
    );
    assert_eq!(record.text_body(), None);
    assert_eq!(record.contact_info, DecodedField::Json(json!({})));

    Ok(())
}

/// Test: Nested fields already sent as objects are kept as JSON
#[test]
fn test_object_fields_accepted() -> Result<()> {
    let response: MessagesResponse = serde_json::from_value(json!({
        "messages": [{
            "message_content": { "text": { "body": "inline" } },
            "contact_info": { "profile": { "name": "Grace" } }
        }]
    }))?;

    let record = MessageRecord::from(response.messages[0].clone());

    assert_eq!(record.text_body(), Some("inline"));
    assert_eq!(record.contact_name(), Some("Grace"));

    Ok(())
}

/// Test: Request logs accept both field spellings
#[test]
fn test_request_log_field_aliases() -> Result<()> {
    let response: RequestLogsResponse = serde_json::from_value(json!({
        "requests": [
            {
                "id": "a1",
                "timestamp": "2025-03-01T10:00:00Z",
                "method": "GET",
                "path": "/templates",
                "status_code": 200,
                "duration_ms": 12.5
            },
            {
                "id": "a2",
                "timestamp": "2025-03-01T10:00:01Z",
                "method": "POST",
                "path": "/send-whatsapp-template",
                "statusCode": 400,
                "durationMs": 3,
                "clientIp": "10.0.0.1",
                "error": "bad request"
            }
        ]
    }))?;

    assert_eq!(response.requests.len(), 2);
    assert_eq!(response.requests[0].status_code, 200);
    assert_eq!(response.requests[1].status_code, 400);
    assert_eq!(response.requests[1].client_ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(response.requests[1].duration_ms, 3.0);

    Ok(())
}
