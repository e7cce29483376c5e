use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::app_state::AppState;
use crate::db::models::{Material, NewMaterial};
use crate::db::repositories::MaterialRepository;
use crate::error::{AppError, AppResult};

/// POST /api/public/materials
pub async fn create_material(
    State(state): State<AppState>,
    Json(payload): Json<NewMaterial>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let validated = payload.validate()?;
    let material = MaterialRepository::create(&state.db, &validated).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Material created successfully",
            "data": material,
        })),
    ))
}

/// GET /api/public/materials
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let materials = MaterialRepository::list_all(&state.db).await?;
    Ok(Json(materials))
}

/// GET /api/public/materials/{id}
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Material>> {
    let material = MaterialRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Material not found".to_string()))?;
    Ok(Json(material))
}

/// PUT /api/public/materials/{id}
///
/// Full replacement; updates go through the same category gate as creation.
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewMaterial>,
) -> AppResult<Json<serde_json::Value>> {
    let validated = payload.validate()?;
    let material = MaterialRepository::update(&state.db, id, &validated)
        .await?
        .ok_or_else(|| AppError::NotFound("Material not found".to_string()))?;
    Ok(Json(json!({
        "success": true,
        "message": "Material updated successfully",
        "data": material,
    })))
}

/// DELETE /api/public/materials/{id}
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = MaterialRepository::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Material not found".to_string()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Material deleted successfully",
    })))
}
