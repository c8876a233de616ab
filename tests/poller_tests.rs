use std::time::Duration;

use anyhow::Result;
use messaging_console::clients::poller::MessagePoller;
use serde_json::json;
use tokio::time::{sleep, timeout};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::fixtures::client_for;

/// Test: Poller publishes a snapshot after the first fetch
#[tokio::test]
async fn test_poller_publishes_snapshot() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "message_content": "{\"text\":{\"body\":\"hello\"}}", "contact_info": "{}" }]
        })))
        .mount(&server)
        .await;

    let poller = MessagePoller::spawn(client_for(&server.uri()), Duration::from_secs(30));
    let mut snapshots = poller.subscribe();

    timeout(Duration::from_secs(5), snapshots.changed()).await??;

    let snapshot = poller.latest();
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].text_body(), Some("hello"));
    assert!(snapshot.fetched_at.is_some());
    assert!(snapshot.error.is_none());

    poller.shutdown().await;

    Ok(())
}

/// Test: Poller keeps polling on the configured interval
#[tokio::test]
async fn test_poller_repeats_on_interval() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "messages": [] })))
        .mount(&server)
        .await;

    let poller = MessagePoller::spawn(client_for(&server.uri()), Duration::from_millis(50));

    sleep(Duration::from_millis(400)).await;
    poller.shutdown().await;

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(
        requests.len() >= 3,
        "expected repeated polls, got {}",
        requests.len()
    );

    Ok(())
}

/// Test: Failed polls record the error and keep earlier messages
#[tokio::test]
async fn test_poller_records_errors() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "detail": "database offline" })))
        .mount(&server)
        .await;

    let poller = MessagePoller::spawn(client_for(&server.uri()), Duration::from_secs(30));
    let mut snapshots = poller.subscribe();

    timeout(Duration::from_secs(5), snapshots.changed()).await??;

    let snapshot = poller.latest();
    assert_eq!(snapshot.error.as_deref(), Some("database offline"));
    assert!(snapshot.messages.is_empty());
    assert!(snapshot.fetched_at.is_none());

    poller.shutdown().await;

    Ok(())
}

/// Test: Shutdown cancels a fetch that is still in flight
#[tokio::test]
async fn test_shutdown_cancels_in_flight_fetch() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "messages": [] }))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let poller = MessagePoller::spawn(client_for(&server.uri()), Duration::from_secs(30));
    let snapshots = poller.subscribe();

    sleep(Duration::from_millis(100)).await;

    timeout(Duration::from_secs(2), poller.shutdown())
        .await
        .map_err(|_| anyhow::anyhow!("shutdown waited for the in-flight fetch"))?;

    assert!(snapshots.borrow().fetched_at.is_none());

    Ok(())
}
