#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use link_shortener::application::services::{AllocatorSettings, LinkService};
use link_shortener::infrastructure::persistence::MemoryLinkRepository;
use link_shortener::routes::router;
use link_shortener::state::AppState;
use link_shortener::utils::code_generator::CodeGenerator;

pub fn create_test_state() -> AppState {
    let repository = Arc::new(MemoryLinkRepository::new());
    let link_service = Arc::new(LinkService::new(
        repository,
        CodeGenerator::secure(),
        AllocatorSettings::default(),
    ));

    AppState::new(link_service)
}

pub fn create_test_server() -> TestServer {
    TestServer::new(router(create_test_state())).unwrap()
}

/// Shortens `url` and returns the response body.
pub async fn shorten(server: &TestServer, url: &str) -> Value {
    let response = server.post("/shorten").json(&json!({ "url": url })).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub fn short_code(body: &Value) -> String {
    body["shortCode"].as_str().unwrap().to_string()
}
