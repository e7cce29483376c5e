use axum::{routing::get, Router};

use crate::app_state::AppState;

use super::handlers;

pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/materials",
            get(handlers::list_materials).post(handlers::create_material),
        )
        .route(
            "/materials/{id}",
            get(handlers::get_material)
                .put(handlers::update_material)
                .delete(handlers::delete_material),
        )
}
