use super::*;
use crate::config::Timeouts;
use crate::test_support::{envelope, test_state, user_json};

#[tokio::test]
async fn from_config_uses_file_token_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");
    let config = ClientConfig {
        api_url: "http://127.0.0.1:9/api".into(),
        storage_path: path.clone(),
        timeouts: Timeouts::default(),
    };

    let state = ClientState::from_config(&config).unwrap();
    state.tokens.set("persisted").unwrap();

    let reopened = FileTokenStore::new(path);
    assert_eq!(reopened.get().as_deref(), Some("persisted"));
}

#[tokio::test]
async fn clones_share_session_and_notifications() {
    let (state, transport) = test_state(None);
    let other = state.clone();
    transport.push_json(200, envelope(serde_json::json!({ "user": user_json(), "token": "t" })));

    let credentials = crate::net::types::LoginRequest { email: "ana@example.com".into(), password: "pw".into() };
    state.session.login(&credentials).await.unwrap();
    other.notifications.info("hello");

    assert!(other.session.is_authenticated());
    assert_eq!(other.tokens.get().as_deref(), Some("t"));
    assert_eq!(state.notifications.len(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_reported_as_status_zero() {
    let (state, transport) = test_state(Some("t"));
    transport.push_failure("connection refused");

    let err = state.cars.stats().await.unwrap_err();
    assert_eq!(err.status(), Some(0));
    assert_eq!(state.notifications.len(), 1);
    assert_eq!(state.tokens.get().as_deref(), Some("t"));
}
