use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::{self, Environment};
use crate::db::models::{IncidentValidationError, MaterialValidationError, ReportValidationError};
use crate::db::DatabaseError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl From<ReportValidationError> for AppError {
    fn from(err: ReportValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<MaterialValidationError> for AppError {
    fn from(err: MaterialValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<IncidentValidationError> for AppError {
    fn from(err: IncidentValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        AppError::Validation(format!("Validation failed: {}", details.join(", ")))
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => {
                    (StatusCode::NOT_FOUND, "Resource not found".to_string())
                }
                DatabaseError::Duplicate => (StatusCode::CONFLICT, err.to_string()),
                DatabaseError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                DatabaseError::ConnectionError(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database connection failed. Please check database service.".to_string(),
                ),
                DatabaseError::Sqlx(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred.".to_string(),
                ),
            },
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        // Internal detail stays out of production responses.
        let body = if config::environment() == Environment::Production {
            json!({
                "success": false,
                "message": message,
            })
        } else {
            json!({
                "success": false,
                "message": message,
                "detail": self.to_string(),
            })
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let (status, message) =
            AppError::from(ReportValidationError::InvalidDateFormat).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid date format");
    }

    #[test]
    fn image_cap_has_its_own_message() {
        let (status, message) =
            AppError::from(ReportValidationError::ImageTooLarge).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Image too large. Maximum size is 10MB.");
    }

    #[test]
    fn not_found_is_distinct_from_validation() {
        let (status, _) = AppError::NotFound("Report not found".to_string()).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_rows_conflict() {
        let (status, _) = AppError::Database(DatabaseError::Duplicate).status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn connection_failures_surface_as_unavailable() {
        let err = AppError::Database(DatabaseError::ConnectionError("refused".to_string()));
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
