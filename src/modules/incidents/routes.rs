use axum::{
    routing::{get, post, put},
    Router,
};

use crate::app_state::AppState;

use super::handlers;

pub fn incident_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_incidents).post(handlers::create_incident),
        )
        .route("/{id}", get(handlers::get_incident))
        .route("/{id}/status", put(handlers::update_incident_status))
        .route("/{id}/comments", post(handlers::add_comment))
}
