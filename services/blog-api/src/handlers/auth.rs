//! Authentication handlers (register, login, profile)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use quill_axum::RequireAuth;
use quill_db::UserRepository;
use quill_types::UserId;
use serde::{Deserialize, Serialize};

use super::shared::{created, json_body, ok, validate_email, validate_username, UserView};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub token: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let req = json_body(body)?;
    validate_username(&req.username)?;
    validate_email(&req.email)?;

    let user = state
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(created("User registered successfully", UserView::from(&user)))
}

/// POST /api/v1/auth/login
///
/// Unknown user and wrong password produce the same 401
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let req = json_body(body)?;
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required".into()));
    }

    let outcome = state.auth.login(&req.username, &req.password).await?;

    Ok(ok(
        "Login successful",
        LoginResponse {
            id: outcome.user.id,
            username: outcome.user.username,
            email: outcome.user.email,
            token: outcome.token,
        },
    ))
}

/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .repos
        .users
        .find_by_id(auth.user_id())
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(ok("Profile retrieved successfully", UserView::from(&user)))
}
