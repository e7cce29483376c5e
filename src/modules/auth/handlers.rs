use axum::{extract::State, http::StatusCode, Json};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::db::models::{LoginUser, RegisterUser};
use crate::db::repositories::UserRepository;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;

    if payload.password.expose_secret().len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let email = payload.email.to_lowercase();
    if UserRepository::exists(&state.db, &email, &payload.username).await? {
        return Err(AppError::Conflict(
            "User with this email or username already exists".to_string(),
        ));
    }

    let password_hash = hash_password(payload.password.expose_secret())
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let user = UserRepository::create(
        &state.db,
        &payload.username,
        &email,
        &password_hash,
        &payload.full_name,
        payload.department.as_deref(),
        payload.phone.as_deref(),
    )
    .await?;

    let token = generate_token(user.id, &state.env.jwt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    info!(user_id = user.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "data": { "user": user, "token": token },
        })),
    ))
}

/// POST /api/auth/login
///
/// The credential field accepts an email or a username; either way a bad
/// match answers with the same message so the two cannot be told apart.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginUser>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;

    let user = UserRepository::find_by_email_or_username(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    let matches = verify_password(payload.password.expose_secret(), &user.password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if !matches {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::Authentication(
            "Account is inactive. Please contact administrator.".to_string(),
        ));
    }

    let token = generate_token(user.id, &state.env.jwt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    info!(user_id = user.id, "login succeeded");

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": { "user": user, "token": token },
    })))
}

/// GET /api/auth/me
pub async fn me(current: CurrentUser) -> AppResult<Json<serde_json::Value>> {
    Ok(Json(json!({
        "success": true,
        "data": { "user": current.0 },
    })))
}
