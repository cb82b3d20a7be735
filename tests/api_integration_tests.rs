//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, including the
//! plain-text statistics reports.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use prefix_cache::{api::create_router, AppState, Config};
use serde_json::Value;
use std::thread::sleep;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let state = AppState::from_config(&Config::default());
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn put_set(key: &str, value: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(format!(
            r#"{{"key":"{}","value":"{}"}}"#,
            key, value
        )))
        .unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app.oneshot(put_set("test:key", "test_value")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("message").is_some());
    assert!(json["message"].as_str().unwrap().contains("test:key"));
}

#[tokio::test]
async fn test_set_endpoint_with_ttl() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key":"ttl:key","value":"ttl_value","ttl":60}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set("get:key", "get_value"))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_req("/get/get:key")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), "get:key");
    assert_eq!(json["value"].as_str().unwrap(), "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_req("/get/nonexistent_key")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set("delete:key", "delete_value"))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let del_response = app
        .clone()
        .oneshot(delete_req("/del/delete:key"))
        .await
        .unwrap();
    assert_eq!(del_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_req("/get/delete:key")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(delete_req("/del/nonexistent_key"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == STATS Summary Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("stats:key", "stats_value"))
        .await
        .unwrap();
    let _ = app
        .clone()
        .oneshot(put_set("other:key", "other_value"))
        .await
        .unwrap();

    let response = app.oneshot(get_req("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["entries"].as_u64().unwrap(), 2);
    assert_eq!(json["tracked_prefixes"].as_u64().unwrap(), 2);
    assert_eq!(json["prefix_delimiter"].as_str().unwrap(), ":");
}

// == Prefix Report Endpoint Tests ==

#[tokio::test]
async fn test_prefix_report_empty() {
    let app = create_test_app();

    let response = app.oneshot(get_req("/stats/prefixes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_to_string(response.into_body()).await;
    assert_eq!(text, "END\r\n");
}

#[tokio::test]
async fn test_prefix_report_after_traffic() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("user:1", "alice"))
        .await
        .unwrap();
    let _ = app.clone().oneshot(get_req("/get/user:1")).await.unwrap();
    let _ = app.clone().oneshot(get_req("/get/user:2")).await.unwrap();
    let _ = app
        .clone()
        .oneshot(delete_req("/del/user:1"))
        .await
        .unwrap();

    let response = app.oneshot(get_req("/stats/prefixes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_to_string(response.into_body()).await;

    assert!(text.ends_with("END\r\n"));
    let line = text
        .lines()
        .find(|l| l.starts_with("PREFIX user "))
        .expect("report must contain a line for the user prefix");
    assert!(line.contains("get 2"));
    assert!(line.contains("hit 1"));
    assert!(line.contains("set 1"));
    assert!(line.contains("del 1"));
    assert!(line.contains("item 0"));
}

#[tokio::test]
async fn test_prefix_report_wildcard_for_plain_keys() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("plainkey", "value"))
        .await
        .unwrap();

    let response = app.oneshot(get_req("/stats/prefixes")).await.unwrap();
    let text = body_to_string(response.into_body()).await;

    assert!(text.contains("PREFIX *wildcard* "));
}

#[tokio::test]
async fn test_clear_prefix_stats() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("user:1", "alice"))
        .await
        .unwrap();

    let clear_response = app
        .clone()
        .oneshot(delete_req("/stats/prefixes"))
        .await
        .unwrap();
    assert_eq!(clear_response.status(), StatusCode::OK);

    let response = app.oneshot(get_req("/stats/prefixes")).await.unwrap();
    let text = body_to_string(response.into_body()).await;
    assert_eq!(text, "END\r\n");
}

// == Histogram Endpoint Tests ==

#[tokio::test]
async fn test_size_report_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("user:1", "alice"))
        .await
        .unwrap();

    let response = app.oneshot(get_req("/stats/sizes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_to_string(response.into_body()).await;
    assert!(text.ends_with("END\r\n"));
    #[cfg(feature = "size-buckets")]
    assert!(text.contains("sets"), "a set of 5 bytes must show up");
}

#[tokio::test]
async fn test_cost_benefit_report_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("user:1", "alice"))
        .await
        .unwrap();
    let _ = app.clone().oneshot(get_req("/get/user:1")).await.unwrap();

    let response = app.oneshot(get_req("/stats/costbenefit")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_to_string(response.into_body()).await;
    assert!(text.ends_with("END\r\n"));
    #[cfg(feature = "cost-benefit")]
    assert!(text.contains("hits:"));
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get_req("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 422 for JSON parsing errors by default
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key":"","value":"test"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"key":"ttl:test","value":"expires_soon","ttl":1}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.clone().oneshot(get_req("/get/ttl:test")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    // Wait for TTL to expire
    sleep(Duration::from_millis(1100));

    let get_response = app.clone().oneshot(get_req("/get/ttl:test")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);

    // The lazy expiry is charged to the prefix
    let report = app.oneshot(get_req("/stats/prefixes")).await.unwrap();
    let text = body_to_string(report.into_body()).await;
    let line = text
        .lines()
        .find(|l| l.starts_with("PREFIX ttl "))
        .expect("report must contain a line for the ttl prefix");
    assert!(line.contains("exp 1"));
}
