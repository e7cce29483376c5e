use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::me))
}
