mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use safetyku_backend::app;
use safetyku_backend::app_state::AppState;
use safetyku_backend::db;

use common::{body_json, json_request, test_config};

async fn db_app() -> axum::Router {
    let mut config = test_config();
    config.database.url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");

    let pool = db::init_pool(&config.database)
        .await
        .expect("pool + migrations should come up");
    app::create_router(AppState::new(pool, config))
}

/// Full lifecycle against a real database: create, verify defaults, walk the
/// status workflow, delete, then confirm the id is gone.
///
/// Run with a disposable Postgres and `DATABASE_URL` pointing at it:
/// `cargo test --test scenario_api -- --ignored`
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn report_lifecycle_end_to_end() {
    let app = db_app().await;

    // Create: title carries no keyword, so severity defaults to ringan.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/public/reports",
            json!({
                "title": "Lantai licin dekat lobi",
                "description": "Air menggenang setelah hujan",
                "location": "Lobi utama",
                "date": "12/05/2024",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["severity"], "ringan");
    assert_eq!(created["status"], "belum_dicek");
    assert_eq!(created["date"], "12 May 2024");
    let id = created["id"].as_i64().unwrap();

    // Skip straight to aman: no transition is illegal.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/public/reports/{id}"),
            json!({ "status": "aman" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["status"], "aman");

    // Re-setting the current status is also fine.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/public/reports/{id}"),
            json!({ "status": "aman" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delete, then the id answers 404 on every verb.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/public/reports/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["success"], true);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/public/reports/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Report not found");
}

/// A mixed-case registration email must still log in with the exact string
/// the user typed: storage lowercases, so the login lookup has to as well.
#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn mixed_case_email_round_trips_through_login() {
    let app = db_app().await;

    let tag = uuid::Uuid::now_v7().simple().to_string();
    let email = format!("Budi.{tag}@Example.com");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": format!("budi-{tag}"),
                "email": email,
                "password": "secret123",
                "full_name": "Budi Santoso",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["user"]["email"], email.to_lowercase());

    // Login with the verbatim mixed-case string from registration.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": email, "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
}
