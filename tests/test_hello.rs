use axum::http::{Method, StatusCode};
use serde_json::json;

mod helpers;
use helpers::*;

#[tokio::test]
async fn test_hello_world() {
    let app = setup_test_app().await;

    let (status, body) = get(&app, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "hello world" }));
}

#[tokio::test]
async fn test_health_reports_ok() {
    let app = setup_test_app().await;

    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app().await;

    let (status, body) = get(&app, "/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Record is not found" }));
}

#[tokio::test]
async fn test_wrong_method_keeps_error_shape() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, Method::PUT, "/articles", None, None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "message": "Method not allowed" }));
}

#[tokio::test]
async fn test_oversized_body_keeps_error_shape() {
    let app = setup_test_app().await;
    let huge = "x".repeat(2 * 1024 * 1024);

    let (status, body) = post(
        &app,
        "/users",
        None,
        json!({ "username": huge, "email": "alice@example.com", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "message": "Request body is too large" }));
}
