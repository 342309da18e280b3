//! Integration tests for the Telegram client using WireMock
//!
//! These tests mock the Bot API to verify request shapes and error mapping
//! without talking to Telegram.

use integration_telegram::{TelegramClient, TelegramClientConfig, TelegramError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

const TOKEN: &str = "123:test-token";

fn client_for(server: &MockServer) -> TelegramClient {
    let config = TelegramClientConfig::new(TOKEN)
        .with_api_url(server.uri())
        .with_poll_timeout(0)
        .with_request_timeout(5);
    TelegramClient::new(config).expect("Failed to create client")
}

fn method_path(name: &str) -> String {
    format!("/bot{TOKEN}/{name}")
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": result}))
}

fn api_error(status: u16, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "ok": false,
        "error_code": status,
        "description": description,
    }))
}

fn text_update(update_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1_700_000_000,
            "chat": {"id": 42, "type": "private"},
            "from": {"id": 7, "is_bot": false, "first_name": "Ann"},
            "text": text,
        }
    })
}

// =============================================================================
// getMe Tests
// =============================================================================

#[tokio::test]
async fn get_me_returns_bot_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getMe")))
        .respond_with(ok(serde_json::json!({
            "id": 1,
            "is_bot": true,
            "first_name": "Kbot",
            "username": "kbot",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let me = client_for(&server).get_me().await.unwrap();
    assert!(me.is_bot);
    assert_eq!(me.username.as_deref(), Some("kbot"));
}

#[tokio::test]
async fn get_me_with_bad_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getMe")))
        .respond_with(api_error(401, "Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_me().await.unwrap_err();
    assert!(matches!(err, TelegramError::Unauthorized(_)));
    assert!(!err.is_retryable());
}

// =============================================================================
// getUpdates Tests
// =============================================================================

#[tokio::test]
async fn get_updates_sends_offset_and_parses_updates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getUpdates")))
        .and(body_partial_json(serde_json::json!({"offset": 11, "timeout": 0})))
        .respond_with(ok(serde_json::json!([
            text_update(11, "/start hello"),
            text_update(12, "/start"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let updates = client_for(&server).get_updates(Some(11)).await.unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].update_id, 11);

    let messages: Vec<_> = updates
        .into_iter()
        .filter_map(|u| u.into_inbound(Some("kbot")))
        .collect();
    assert_eq!(messages[0].payload.as_str(), "hello");
    assert!(messages[1].payload.is_empty());
}

#[tokio::test]
async fn get_updates_requests_messages_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getUpdates")))
        .and(body_partial_json(serde_json::json!({"allowed_updates": ["message"]})))
        .respond_with(ok(serde_json::json!([{
            "update_id": 40,
            "channel_post": {
                "message_id": 1,
                "date": 1_700_000_000,
                "chat": {"id": -100, "type": "channel"},
                "text": "/start hello",
            }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let updates = client_for(&server).get_updates(None).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert!(
        updates
            .into_iter()
            .filter_map(|u| u.into_inbound(Some("kbot")))
            .next()
            .is_none()
    );
}

#[tokio::test]
async fn get_updates_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getUpdates")))
        .respond_with(ok(serde_json::json!([])))
        .mount(&server)
        .await;

    let updates = client_for(&server).get_updates(None).await.unwrap();
    assert!(updates.is_empty());
}

#[tokio::test]
async fn get_updates_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getUpdates")))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 5",
            "parameters": {"retry_after": 5},
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_updates(None).await.unwrap_err();
    assert!(matches!(err, TelegramError::RateLimited { retry_after: 5 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn non_json_body_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("getUpdates")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_updates(None).await.unwrap_err();
    assert!(matches!(err, TelegramError::Protocol(_)));
}

// =============================================================================
// sendMessage Tests
// =============================================================================

#[tokio::test]
async fn send_message_posts_chat_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("sendMessage")))
        .and(body_partial_json(serde_json::json!({
            "chat_id": 42,
            "text": "Hello I'm Kbot 1.2.0!",
        })))
        .respond_with(ok(serde_json::json!({
            "message_id": 99,
            "date": 1_700_000_001,
            "chat": {"id": 42, "type": "private"},
            "text": "Hello I'm Kbot 1.2.0!",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sent = client_for(&server)
        .send_message(42, "Hello I'm Kbot 1.2.0!")
        .await
        .unwrap();
    assert_eq!(sent.message_id, 99);
}

#[tokio::test]
async fn send_message_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(method_path("sendMessage")))
        .respond_with(api_error(400, "Bad Request: chat not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).send_message(1, "hi").await.unwrap_err();
    match err {
        TelegramError::Api { code, description } => {
            assert_eq!(code, 400);
            assert_eq!(description, "Bad Request: chat not found");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let config = TelegramClientConfig::new(TOKEN)
        .with_api_url("http://127.0.0.1:1")
        .with_poll_timeout(0)
        .with_request_timeout(2);
    let client = TelegramClient::new(config).unwrap();

    let err = client.get_me().await.unwrap_err();
    assert!(matches!(err, TelegramError::Request(_)));
    assert!(err.is_retryable());
}
