use serde_json::json;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studybuddy::config::GatewayConfig;
use studybuddy::error::kind_of;
use studybuddy::{HttpReplyGateway, ReplyGateway, StudyBuddyError};

fn gateway_for(server: &MockServer) -> HttpReplyGateway {
    let cfg = GatewayConfig {
        endpoint: format!("{}/chat", server.uri()),
        timeout_seconds: Some(5),
    };
    HttpReplyGateway::new(&cfg).unwrap()
}

fn is_network_error(err: &anyhow::Error) -> bool {
    matches!(kind_of(err), Some(StudyBuddyError::Network(_)))
}

/// The message is posted as `{"message": ...}` and `reply` is returned
#[tokio::test]
async fn test_send_returns_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "Explain gravity" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Gravity is the attraction between masses."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = gateway_for(&server).send("Explain gravity").await.unwrap();
    assert_eq!(reply, "Gravity is the attraction between masses.");
}

/// Extra response fields are ignored
#[tokio::test]
async fn test_send_ignores_extra_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "ok",
            "model": "tutor"
        })))
        .mount(&server)
        .await;

    assert_eq!(gateway_for(&server).send("hi").await.unwrap(), "ok");
}

/// A non-2xx status is a network error, with exactly one attempt
#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_for(&server).send("hi").await.unwrap_err();
    assert!(is_network_error(&err), "unexpected error: {:?}", err);
}

/// A body without `reply` is a network error
#[tokio::test]
async fn test_malformed_body_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "nope" })))
        .mount(&server)
        .await;

    let err = gateway_for(&server).send("hi").await.unwrap_err();
    assert!(is_network_error(&err));
}

/// An unreachable backend is a network error
#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);
    drop(server);

    let err = gateway.send("hi").await.unwrap_err();
    assert!(is_network_error(&err));
}
