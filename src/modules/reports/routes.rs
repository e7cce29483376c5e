use axum::{routing::get, Router};

use crate::app_state::AppState;

use super::handlers;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
}
