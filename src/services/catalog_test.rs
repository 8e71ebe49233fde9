use super::*;
use crate::net::request::RequestBody;
use crate::notify::NotificationKind;
use crate::test_support::{envelope, test_state};
use reqwest::Method;

#[tokio::test]
async fn list_decodes_catalogs() {
    let (state, transport) = test_state(Some("tok"));
    transport.push_json(
        200,
        envelope(serde_json::json!({
            "catalogs": [{
                "_id": "k1",
                "marca": "Toyota",
                "modelos": [{ "nombre": "Corolla", "isActive": true }, { "nombre": "Celica", "isActive": false }]
            }]
        })),
    );

    let response = state.catalog.list().await.unwrap();
    let catalog = &response.data.catalogs[0];
    assert_eq!(catalog.marca, "Toyota");
    assert!(!catalog.modelos[1].is_active);
    assert_eq!(transport.last_request().path, "/catalogs");
}

#[tokio::test]
async fn lookups_hit_their_paths() {
    let (state, transport) = test_state(Some("tok"));
    transport.push_json(200, envelope(serde_json::json!({ "marcas": ["Ford", "Toyota"] })));
    transport.push_json(200, envelope(serde_json::json!({ "marca": "Land Rover", "modelos": ["Defender"] })));
    transport.push_json(200, envelope(serde_json::json!({ "anios": [2024, 2023] })));

    assert_eq!(state.catalog.brands().await.unwrap().data.marcas, vec!["Ford", "Toyota"]);
    assert_eq!(state.catalog.models("Land Rover").await.unwrap().data.modelos, vec!["Defender"]);
    assert_eq!(state.catalog.years().await.unwrap().data.anios, vec![2024, 2023]);

    let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/catalogs/brands", "/catalogs/models/Land%20Rover", "/catalogs/years"]);
}

#[tokio::test]
async fn initialize_posts_empty_object() {
    let (state, transport) = test_state(Some("tok"));
    transport.push_json(201, envelope(serde_json::json!({ "message": "Catalogs initialized" })));

    let response = state.catalog.initialize().await.unwrap();
    assert_eq!(response.data.message, "Catalogs initialized");

    let sent = transport.last_request();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path, "/catalogs/initialize");
    assert_eq!(sent.body, RequestBody::Json(serde_json::json!({})));
}

#[tokio::test]
async fn server_error_without_payload_uses_default_message() {
    let (state, transport) = test_state(Some("tok"));
    transport.push(Ok(crate::net::transport::RawResponse {
        status: 500,
        status_text: "Internal Server Error".into(),
        body: b"<html>oops</html>".to_vec(),
    }));

    let err = state.catalog.years().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    let notes = state.notifications.snapshot();
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, crate::net::types::DEFAULT_ERROR_MESSAGE);
}
