use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use moctale_coordinator::{
    AgentLocator, CacheTtls, MemoryHandoffStore, RelayServer, RelayServerConfig, RequestRouter,
    ResponseCache,
};
use moctale_core::config::AppConfig;
use moctale_core::mocks::MockBrowserRuntime;

fn build_app(runtime: Arc<MockBrowserRuntime>) -> axum::Router {
    let config = AppConfig::default();
    let cache = Arc::new(ResponseCache::new(CacheTtls::default()));
    let locator = AgentLocator::new(runtime.clone(), &config.site, &config.agent);
    let handoff = Arc::new(MemoryHandoffStore::new());
    let router = Arc::new(RequestRouter::new(
        cache, locator, runtime, handoff, &config,
    ));
    RelayServer::new(RelayServerConfig::default(), router).build_router()
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> Value {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_app(Arc::new(MockBrowserRuntime::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_message_returns_envelope_for_validation_failure() {
    let app = build_app(Arc::new(MockBrowserRuntime::new()));

    let json = post_json(
        app,
        "/v1/message",
        json!({ "type": "SEARCH_MOVIES", "query": "  " }),
    )
    .await;

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_message_surfaces_missing_tab() {
    let app = build_app(Arc::new(MockBrowserRuntime::new()));

    let json = post_json(app, "/v1/message", json!({ "type": "CHECK_SESSION" })).await;

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "NO_MOCTALE_TAB");
}

#[tokio::test]
async fn test_pending_search_trigger_feeds_the_next_read() {
    let runtime = Arc::new(MockBrowserRuntime::new());
    let app = build_app(runtime);

    let stash = post_json(
        app.clone(),
        "/v1/pending-search",
        json!({ "query": "Blade Runner" }),
    )
    .await;
    assert_eq!(stash["success"], true);

    let read = post_json(
        app.clone(),
        "/v1/message",
        json!({ "type": "GET_PENDING_SEARCH" }),
    )
    .await;
    assert_eq!(read["success"], true);
    assert_eq!(read["query"], "Blade Runner");

    let cleared = post_json(
        app.clone(),
        "/v1/message",
        json!({ "type": "CLEAR_PENDING_SEARCH" }),
    )
    .await;
    assert_eq!(cleared["success"], true);

    let read = post_json(app, "/v1/message", json!({ "type": "GET_PENDING_SEARCH" })).await;
    assert_eq!(read["query"], Value::Null);
}
