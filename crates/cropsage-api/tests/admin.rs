//! Integration tests for admin CRUD and `AdminSession` refetch-after-write.

use cropsage_api::{AdminSession, AdminToken, ApiError, CropSageClient};
use cropsage_core::{Problem, StoreRecord};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> CropSageClient {
    CropSageClient::with_base_url(5, "cropsage-test/0.1", &format!("{}/api", server.uri()))
        .expect("client construction should not fail")
}

fn token() -> AdminToken {
    AdminToken::new("abc123")
}

fn blight_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Leaf Blight",
        "aliases": [],
        "symptoms": ["brown spots"],
        "remedies": ["Copper fungicide"],
        "severity": "high",
        "description": null,
        "causes": null
    })
}

fn store_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Kisan Seva Kendra",
        "address": "Station Road",
        "phone": "",
        "lat": 20.0,
        "lng": 78.0
    })
}

/// Mounts list endpoints that must be hit exactly `times` times each.
async fn mount_lists(
    server: &MockServer,
    problems: serde_json::Value,
    stores: serde_json::Value,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path("/api/problems/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(problems))
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/stores/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stores))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_problems_sends_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/problems/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([blight_json(1)])))
        .mount(&server)
        .await;

    let problems = test_client(&server)
        .list_problems(&token())
        .await
        .expect("list should succeed");
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].name, "Leaf Blight");
    assert_eq!(problems[0].severity, "high");
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stores/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = test_client(&server).list_stores(&token()).await;
    assert!(
        matches!(result, Err(ApiError::Unauthorized { status: 401, .. })),
        "expected Unauthorized, got: {result:?}"
    );
}

#[tokio::test]
async fn delete_missing_store_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/stores/42/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server).delete_store(&token(), 42).await;
    assert!(matches!(result, Err(ApiError::NotFound { .. })), "got: {result:?}");
}

#[tokio::test]
async fn session_login_fetches_both_lists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin_login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(&server)
        .await;
    mount_lists(&server, json!([blight_json(1)]), json!([store_json(2)]), 1).await;

    let session = AdminSession::login(test_client(&server), "admin", "pw")
        .await
        .expect("session should open");

    assert_eq!(session.token(), &token());
    assert_eq!(session.problems().len(), 1);
    assert_eq!(session.stores().len(), 1);
    assert_eq!(session.stores()[0].id, Some(2));
}

#[tokio::test]
async fn saving_new_problem_posts_then_refetches() {
    let server = MockServer::start().await;
    mount_lists(&server, json!([blight_json(1)]), json!([]), 2).await;

    Mock::given(method("POST"))
        .and(path("/api/problems/"))
        .and(header("Authorization", "Token abc123"))
        .and(body_json(json!({
            "name": "Leaf Blight",
            "aliases": [],
            "symptoms": [],
            "remedies": [],
            "severity": "medium",
            "description": null,
            "causes": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(blight_json(1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = AdminSession::open(test_client(&server), token())
        .await
        .expect("session should open");
    let saved = session
        .save_problem(&Problem::named("Leaf Blight"))
        .await
        .expect("save should succeed");

    assert_eq!(saved.id, Some(1));
}

#[tokio::test]
async fn saving_existing_store_puts_to_its_id_then_refetches() {
    let server = MockServer::start().await;
    mount_lists(&server, json!([]), json!([store_json(2)]), 2).await;

    Mock::given(method("PUT"))
        .and(path("/api/stores/2/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(store_json(2)))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = AdminSession::open(test_client(&server), token())
        .await
        .expect("session should open");
    let store = StoreRecord {
        id: Some(2),
        name: "Kisan Seva Kendra".to_string(),
        address: "Station Road".to_string(),
        phone: String::new(),
        latitude: 20.0,
        longitude: 78.0,
    };
    session.save_store(&store).await.expect("update should succeed");
}

#[tokio::test]
async fn deleting_problem_refetches_lists() {
    let server = MockServer::start().await;
    mount_lists(&server, json!([blight_json(1)]), json!([]), 2).await;

    Mock::given(method("DELETE"))
        .and(path("/api/problems/1/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = AdminSession::open(test_client(&server), token())
        .await
        .expect("session should open");
    session.delete_problem(1).await.expect("delete should succeed");
}

#[tokio::test]
async fn failed_write_skips_refetch() {
    let server = MockServer::start().await;
    mount_lists(&server, json!([]), json!([]), 1).await;

    Mock::given(method("POST"))
        .and(path("/api/stores/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "lat": ["required"] })))
        .mount(&server)
        .await;

    let mut session = AdminSession::open(test_client(&server), token())
        .await
        .expect("session should open");
    let store = StoreRecord {
        id: None,
        name: "Bad".to_string(),
        address: String::new(),
        phone: String::new(),
        latitude: 0.0,
        longitude: 0.0,
    };
    let result = session.save_store(&store).await;
    assert!(
        matches!(result, Err(ApiError::UnexpectedStatus { status: 400, .. })),
        "got: {result:?}"
    );
}
