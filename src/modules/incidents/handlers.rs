use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    IncidentSeverity, IncidentStatus, IncidentType, NewIncident, NewIncidentComment,
    UpdateIncidentStatus,
};
use crate::db::repositories::{IncidentFilter, IncidentRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Row offset for a page, or `None` when the caller-chosen page number is
/// large enough to overflow the multiplication.
fn list_offset(page: i64, limit: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(limit)
}

#[derive(Debug, Deserialize)]
pub struct ListIncidentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<IncidentStatus>,
    pub severity: Option<IncidentSeverity>,
    pub incident_type: Option<IncidentType>,
}

/// GET /api/incidents
///
/// Paginated listing. Plain accounts only see their own incidents;
/// reviewers see everything.
pub async fn list_incidents(
    current: CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ListIncidentsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if page < 1 {
        return Err(AppError::Validation(
            "Validation failed: page must be a positive integer".to_string(),
        ));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "Validation failed: limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let offset = list_offset(page, limit).ok_or_else(|| {
        AppError::Validation("Validation failed: page is out of range".to_string())
    })?;

    let filter = IncidentFilter {
        user_id: (!current.role().is_reviewer()).then(|| current.id()),
        status: params.status,
        severity: params.severity,
        incident_type: params.incident_type,
    };

    let total = IncidentRepository::count(&state.db, &filter).await?;
    let incidents = IncidentRepository::list(&state.db, &filter, limit, offset).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "incidents": incidents,
            "pagination": {
                "page": page,
                "limit": limit,
                "total": total,
                "total_pages": (total + limit - 1) / limit,
            },
        },
    })))
}

/// GET /api/incidents/{id}
pub async fn get_incident(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let incident = IncidentRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Incident report not found".to_string()))?;

    if !current.role().is_reviewer() && incident.user_id != current.id() {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    let comments = IncidentRepository::list_comments(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "incident": incident, "comments": comments },
    })))
}

/// POST /api/incidents
pub async fn create_incident(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<NewIncident>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let validated = payload.validate()?;

    let incident = IncidentRepository::create(&state.db, current.id(), &validated).await?;

    info!(incident_id = incident.id, user_id = current.id(), "incident reported");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Incident report submitted successfully",
            "data": { "incident": incident },
        })),
    ))
}

/// PUT /api/incidents/{id}/status
///
/// Reviewer-only. Any status may follow any other; reaching `resolved` or
/// `closed` stamps the resolution time.
pub async fn update_incident_status(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateIncidentStatus>,
) -> AppResult<Json<serde_json::Value>> {
    current.require_reviewer()?;

    let incident = IncidentRepository::update_status(
        &state.db,
        id,
        payload.status,
        payload.resolution_notes.as_deref(),
        current.id(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Incident report not found".to_string()))?;

    info!(
        incident_id = id,
        status = incident.status.as_str(),
        reviewer_id = current.id(),
        "incident status updated"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Incident status updated successfully",
        "data": { "incident": incident },
    })))
}

/// POST /api/incidents/{id}/comments
pub async fn add_comment(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewIncidentComment>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;

    let incident = IncidentRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Incident report not found".to_string()))?;

    if !current.role().is_reviewer() && incident.user_id != current.id() {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    let comment =
        IncidentRepository::add_comment(&state.db, id, current.id(), &payload.comment).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Comment added successfully",
            "data": { "comment": comment },
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_offset_pages_from_zero() {
        assert_eq!(list_offset(1, 10), Some(0));
        assert_eq!(list_offset(3, 10), Some(20));
        assert_eq!(list_offset(2, 100), Some(100));
    }

    #[test]
    fn list_offset_rejects_overflowing_page() {
        // A page number past i64 range for the multiplication must be turned
        // away instead of wrapping into a negative OFFSET.
        assert_eq!(list_offset(184_467_440_737_095_517, 100), None);
        assert_eq!(list_offset(i64::MAX, 2), None);
    }
}
