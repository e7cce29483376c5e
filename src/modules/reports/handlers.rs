use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::app_state::AppState;
use crate::db::models::{
    sort_rank, NewReport, ReportResponse, ReportStatus, UpdateReportStatus,
};
use crate::db::repositories::ReportRepository;
use crate::error::{AppError, AppResult};

/// Query parameters for the public report listing.
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// `terberat` (heaviest first) or `teringan` (lightest first).
    pub sort: Option<String>,
    /// `triaged`: only reports whose status has moved past `belum_dicek`.
    pub filter: Option<String>,
}

/// POST /api/public/reports
pub async fn create_report(
    State(state): State<AppState>,
    Json(payload): Json<NewReport>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    let validated = payload.validate(state.env.upload.max_encoded_image_chars)?;

    if let Some(ref image) = validated.image {
        debug!(encoded_len = image.len(), "accepted image payload");
    }

    let report = ReportRepository::create(&state.db, &validated).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReportResponse::from_report(report)),
    ))
}

/// GET /api/public/reports
///
/// Returns every report newest-created-first; no pagination on the public
/// path. Severity sorting re-derives a rank from keywords when the stored
/// severity is unusable (defaulting to sedang, not the creation-time
/// default of ringan).
pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListReportsQuery>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let mut reports = ReportRepository::list_all(&state.db).await?;

    if params.filter.as_deref() == Some("triaged") {
        reports.retain(|r| ReportStatus::from_db_label(&r.status) != ReportStatus::BelumDicek);
    }

    match params.sort.as_deref() {
        Some("terberat") => {
            reports.sort_by_key(|r| -sort_rank(&r.severity, &r.title, &r.description));
        }
        Some("teringan") => {
            reports.sort_by_key(|r| sort_rank(&r.severity, &r.title, &r.description));
        }
        _ => {}
    }

    Ok(Json(
        reports.into_iter().map(ReportResponse::from_report).collect(),
    ))
}

/// GET /api/public/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReportResponse>> {
    let report = ReportRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;
    Ok(Json(ReportResponse::from_report(report)))
}

/// PUT /api/public/reports/{id}
///
/// Sets the workflow status. No transition is illegal: any of the four
/// values may follow any other, including re-setting the current one.
/// Unknown labels fall back to `belum_dicek`.
pub async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateReportStatus>,
) -> AppResult<Json<serde_json::Value>> {
    let status = ReportStatus::from_client(&payload.status);
    let report = ReportRepository::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Report updated successfully",
        "data": ReportResponse::from_report(report),
    })))
}

/// DELETE /api/public/reports/{id}
///
/// Hard delete of a single row. Batch deletion is a caller-side loop of
/// independent calls with no cross-row atomicity.
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = ReportRepository::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Report not found".to_string()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Report deleted successfully",
    })))
}
