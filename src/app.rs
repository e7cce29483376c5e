use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::observability_middleware,
    modules::{
        auth::routes::auth_routes, incidents::routes::incident_routes,
        materials::routes::material_routes, reports::routes::report_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    let public_api = report_routes().merge(material_routes());

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .route("/health/db", get(db_health_check))
        .nest("/api/public", public_api)
        .nest("/api/auth", auth_routes())
        .nest("/api/incidents", incident_routes())
        .layer(cors_layer(&state.env.cors.origin))
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin, "unparseable CORS origin, falling back to any");
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn hello() -> &'static str {
    "SafetyKU Backend says hello!\n"
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe for the database path. Answers 503 when the pool cannot
/// run a trivial statement.
async fn db_health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Ok(Json(json!({
            "status": "ok",
            "database": "healthy",
        }))),
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unhealthy",
                })),
            ))
        }
    }
}
