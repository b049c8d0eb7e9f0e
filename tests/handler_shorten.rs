mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_shorten_creates_link() {
    let server = common::create_test_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["id"], 1);
    assert_eq!(body["url"], "https://example.com/some/long/path");
    assert_eq!(body["accessCount"], 0);
    assert_eq!(body["createdAt"], body["updatedAt"]);

    let code = common::short_code(&body);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_shorten_same_url_returns_existing_link() {
    let server = common::create_test_server();

    let first = common::shorten(&server, "https://example.com/page").await;
    let second = common::shorten(&server, "https://example.com/page").await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["shortCode"], second["shortCode"]);
    assert_eq!(second["accessCount"], 0);
}

#[tokio::test]
async fn test_shorten_url_match_ignores_case() {
    let server = common::create_test_server();

    let first = common::shorten(&server, "https://Example.com/Page").await;
    let second = common::shorten(&server, "https://example.com/page").await;

    assert_eq!(first["shortCode"], second["shortCode"]);
    assert_eq!(second["url"], "https://Example.com/Page");
}

#[tokio::test]
async fn test_shorten_different_urls_get_different_codes() {
    let server = common::create_test_server();

    let first = common::shorten(&server, "https://a.example.com").await;
    let second = common::shorten(&server, "https://b.example.com").await;

    assert_ne!(first["id"], second["id"]);
    assert_ne!(
        common::short_code(&first).to_lowercase(),
        common::short_code(&second).to_lowercase()
    );
}

#[tokio::test]
async fn test_shorten_rejects_unsupported_scheme() {
    let server = common::create_test_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_input");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_shorten_rejects_missing_scheme() {
    let server = common::create_test_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_rejects_missing_host() {
    let server = common::create_test_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "http://" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_rejects_empty_url() {
    let server = common::create_test_server();

    let response = server.post("/shorten").json(&json!({ "url": "" })).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_rejects_missing_field() {
    let server = common::create_test_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "link": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_shorten_rejects_wrong_field_type() {
    let server = common::create_test_server();

    let response = server.post("/shorten").json(&json!({ "url": 5 })).await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_input");
    assert!(body["error"]["details"]["reason"].is_string());
}

#[tokio::test]
async fn test_shorten_rejects_non_json_body() {
    let server = common::create_test_server();

    let response = server.post("/shorten").text("https://example.com").await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_rejected_urls_are_not_stored() {
    let server = common::create_test_server();

    server
        .post("/shorten")
        .json(&json!({ "url": "ftp://example.com" }))
        .await
        .assert_status_bad_request();

    let body = common::shorten(&server, "https://example.com").await;
    assert_eq!(body["id"], 1);
}
