mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, json_request, test_app};

#[tokio::test]
async fn incidents_require_a_token() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/incidents")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No token provided, authorization denied");
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/incidents")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "budi",
                "email": "budi@example.com",
                "password": "abc",
                "full_name": "Budi Santoso",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let app = test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "budi",
                "email": "not-an-email",
                "password": "secret123",
                "full_name": "Budi Santoso",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed:"));
}

#[tokio::test]
async fn login_rejects_empty_credential() {
    let app = test_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "", "password": "whatever" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Email or Employee ID is required"));
}
