use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::auth::jwt::validate_token;
use crate::db::models::{User, UserRole};
use crate::db::repositories::UserRepository;
use crate::error::AppError;

/// Authenticated account extracted from a `Bearer` token in the
/// `Authorization` header.
///
/// The account row is re-read from the database on every request so role
/// changes and deactivations apply immediately. Use as an extractor
/// parameter in any handler that requires authentication.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    /// Reject callers whose role cannot review incidents.
    pub fn require_reviewer(&self) -> Result<(), AppError> {
        if self.role().is_reviewer() {
            Ok(())
        } else {
            Err(AppError::Authorization("Access denied".to_string()))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Authentication(
                    "No token provided, authorization denied".to_string(),
                )
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Authentication(
                "No token provided, authorization denied".to_string(),
            )
        })?;

        let claims = validate_token(token, &state.env.jwt)
            .map_err(|_| AppError::Authentication("Token is not valid".to_string()))?;

        let user = UserRepository::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| AppError::Authentication("Token is not valid".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication(
                "Account is inactive. Please contact administrator.".to_string(),
            ));
        }

        Ok(CurrentUser(user))
    }
}
