//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use lru_kv::{api::create_router, AppState, GlobalLockLru};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(capacity: usize) -> Router {
    create_router(AppState::new(GlobalLockLru::new(capacity)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn write(app: &Router, uri: &str, key: &str, value: &str) -> Response {
    let body = serde_json::json!({ "key": key, "value": value }).to_string();
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn delete(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

// == PUT Endpoint Tests ==

#[tokio::test]
async fn test_put_endpoint_success() {
    let app = create_test_app(100);

    let response = write(&app, "/put", "test_key", "test_value").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["key"].as_str().unwrap(), "test_key");
}

#[tokio::test]
async fn test_put_overwrites_value() {
    let app = create_test_app(100);

    write(&app, "/put", "k", "first").await;
    let response = write(&app, "/put", "k", "second").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(get(&app, "/get/k").await.into_body()).await;
    assert_eq!(json["value"].as_str().unwrap(), "second");
}

#[tokio::test]
async fn test_put_too_large() {
    let app = create_test_app(10);

    let response = write(&app, "/put", "z", "12345678901").await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("capacity of 10"));
}

// == PUT_IF_ABSENT Endpoint Tests ==

#[tokio::test]
async fn test_put_if_absent_conflict() {
    let app = create_test_app(100);

    let response = write(&app, "/put_if_absent", "k", "first").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = write(&app, "/put_if_absent", "k", "second").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_to_json(get(&app, "/get/k").await.into_body()).await;
    assert_eq!(json["value"].as_str().unwrap(), "first");
}

#[tokio::test]
async fn test_put_if_absent_too_large() {
    let app = create_test_app(10);

    // Absent key
    let response = write(&app, "/put_if_absent", "k", "0123456789").await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(get(&app, "/get/k").await.status(), StatusCode::NOT_FOUND);

    // Present key: size is reported before the conflict
    write(&app, "/put", "k", "old").await;
    let response = write(&app, "/put_if_absent", "k", "0123456789").await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = body_to_json(get(&app, "/get/k").await.into_body()).await;
    assert_eq!(json["value"].as_str().unwrap(), "old");
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_requires_existing_key() {
    let app = create_test_app(100);

    let response = write(&app, "/set", "k", "value").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/get/k").await.status(), StatusCode::NOT_FOUND);

    write(&app, "/put", "k", "value").await;
    let response = write(&app, "/set", "k", "updated").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(get(&app, "/get/k").await.into_body()).await;
    assert_eq!(json["value"].as_str().unwrap(), "updated");
}

#[tokio::test]
async fn test_set_too_large_on_present_key() {
    let app = create_test_app(10);
    write(&app, "/put", "k", "old").await;
    write(&app, "/put", "other", "1").await;

    let response = write(&app, "/set", "k", "0123456789").await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_to_json(get(&app, "/get/k").await.into_body()).await;
    assert_eq!(json["value"].as_str().unwrap(), "old");
    assert_eq!(get(&app, "/get/other").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_set_too_large_on_absent_key() {
    let app = create_test_app(10);

    let response = write(&app, "/set", "k", "0123456789").await;

    // Size is reported before the missing key
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(get(&app, "/get/k").await.status(), StatusCode::NOT_FOUND);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app(100);

    let response = get(&app, "/get/nonexistent_key").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app(100);

    write(&app, "/put", "delete_key", "delete_value").await;

    let response = delete(&app, "/del/delete_key").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/get/delete_key").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(&app, "/del/delete_key").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Eviction via API Tests ==

#[tokio::test]
async fn test_lru_eviction_via_api() {
    let app = create_test_app(10);

    write(&app, "/put", "ab", "1").await;
    write(&app, "/put", "cd", "22").await;
    write(&app, "/put", "ef", "333").await;
    assert_eq!(get(&app, "/get/ab").await.status(), StatusCode::NOT_FOUND);

    assert_eq!(get(&app, "/get/cd").await.status(), StatusCode::OK);
    write(&app, "/put", "gh", "4").await;

    assert_eq!(get(&app, "/get/ef").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/get/cd").await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/get/gh").await.status(), StatusCode::OK);

    let json = body_to_json(get(&app, "/stats").await.into_body()).await;
    assert_eq!(json["total_entries"].as_u64().unwrap(), 2);
    assert_eq!(json["current_size"].as_u64().unwrap(), 7);
    assert_eq!(json["evictions"].as_u64().unwrap(), 2);
}

// == KEYS Endpoint Tests ==

#[tokio::test]
async fn test_keys_endpoint_lists_by_recency() {
    let app = create_test_app(100);

    write(&app, "/put", "a", "1").await;
    write(&app, "/put", "b", "2").await;
    write(&app, "/put", "c", "3").await;
    get(&app, "/get/a").await;

    let response = get(&app, "/keys").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["keys"], serde_json::json!(["b", "c", "a"]));
    assert_eq!(json["count"].as_u64().unwrap(), 3);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app(100);

    write(&app, "/put", "stats_key", "stats_value").await;
    get(&app, "/get/stats_key").await; // hit
    get(&app, "/get/nonexistent").await; // miss

    let response = get(&app, "/stats").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["total_entries"].as_u64().unwrap(), 1);
    assert_eq!(json["current_size"].as_u64().unwrap(), 20);
    assert_eq!(json["capacity"].as_u64().unwrap(), 100);
    assert!(json.get("hit_rate").is_some());
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(100);

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app(100);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/put")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app(100);

    let response = write(&app, "/put", "", "test").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}
