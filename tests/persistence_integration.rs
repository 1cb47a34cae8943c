use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studybuddy::config::{GatewayConfig, DEFAULT_FALLBACK_MESSAGE};
use studybuddy::storage::{BlobStore, SledBlobStore, CHATS_KEY};
use studybuddy::{ChatMessage, FolderColor, HttpReplyGateway};
use tempfile::TempDir;

mod common;

fn unreachable_gateway() -> Box<HttpReplyGateway> {
    let cfg = GatewayConfig {
        endpoint: "http://127.0.0.1:9/chat".to_string(),
        timeout_seconds: Some(5),
    };
    Box::new(HttpReplyGateway::new(&cfg).unwrap())
}

/// Chats and folders written by one app are read back by the next
#[tokio::test]
async fn test_history_survives_reopen() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "F = ma" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    {
        let cfg = GatewayConfig {
            endpoint: format!("{}/chat", server.uri()),
            timeout_seconds: None,
        };
        let mut app = common::open_app(&dir, Box::new(HttpReplyGateway::new(&cfg).unwrap()));
        app.send_message("Newton's second law?").await.unwrap();
        app.create_folder("Physics", FolderColor::Purple).unwrap();
        app.move_active_to_folder(0).unwrap();
    }

    let app = common::open_app(&dir, unreachable_gateway());
    let chats = app.state().chats.sessions();
    assert_eq!(chats.len(), 1);
    assert_eq!(
        chats[0].messages,
        vec![ChatMessage::user("Newton's second law?"), ChatMessage::bot("F = ma")]
    );
    assert_eq!(chats[0].preview, "F = ma");

    let folders = app.folder_list();
    assert_eq!(folders[0].name, "Physics");
    assert_eq!(folders[0].color, FolderColor::Purple);
    assert_eq!(app.folder_chats(0).unwrap().len(), 1);
    assert!(app.state().chats.active().is_none());
}

/// A failed send is persisted with the fallback reply
#[tokio::test]
async fn test_fallback_reply_is_persisted() {
    let dir = TempDir::new().unwrap();
    {
        let mut app = common::open_app(&dir, unreachable_gateway());
        let reply = app.send_message("Explain gravity").await.unwrap().unwrap();
        assert!(reply.fell_back);
    }

    let app = common::open_app(&dir, unreachable_gateway());
    assert_eq!(
        app.state().chats.sessions()[0].messages,
        vec![
            ChatMessage::user("Explain gravity"),
            ChatMessage::bot(DEFAULT_FALLBACK_MESSAGE),
        ]
    );
}

/// Corrupt stored chats load as an empty list instead of failing
#[test]
fn test_corrupt_chat_list_loads_empty() {
    let dir = TempDir::new().unwrap();
    {
        let blobs = SledBlobStore::open(dir.path().join("store")).unwrap();
        blobs.write(CHATS_KEY, "{{{").unwrap();
    }

    let mut app = common::open_app(&dir, unreachable_gateway());
    assert!(app.chat_list().is_empty());

    // the next flush replaces the corrupt value
    app.create_folder("Math", FolderColor::Blue).unwrap();
    assert!(app.storage().load_chats().unwrap().is_empty());
}

/// Clearing removes history from disk
#[test]
fn test_clear_all_removes_from_disk() {
    let (storage, dir) = common::create_temp_storage();
    storage
        .flush(&[], &[])
        .expect("initial flush");
    drop(storage);

    let mut app = common::open_app(&dir, unreachable_gateway());
    app.create_folder("Math", FolderColor::Green).unwrap();
    app.clear_all().unwrap();
    drop(app);

    let app = common::open_app(&dir, unreachable_gateway());
    assert!(app.folder_list().is_empty());
}
