//! Shared handler utilities
//!
//! Response envelope, views, and input validation used across handlers.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use quill_auth_core::AuthError;
use quill_db::{CommentRow, PostRow, UserRepository, UserRow};
use quill_types::{ResourceKind, UserId};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Response Envelope
// ============================================================================

/// Success envelope: `{success, message, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 with data
pub fn ok<T: Serialize>(message: &'static str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message,
        data: Some(data),
    })
}

/// 200 without data
pub fn ok_empty(message: &'static str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message,
        data: None,
    })
}

/// 201 with data
pub fn created<T: Serialize>(
    message: &'static str,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(message, data))
}

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRow> for UserView {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: CommentRow,
    pub author: Option<AuthorView>,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: PostRow,
    pub author: Option<AuthorView>,
    /// Whether the caller may update or delete this post
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

/// Look up the public author info for a user
pub async fn author(state: &AppState, id: UserId) -> ApiResult<Option<AuthorView>> {
    Ok(state
        .repos
        .users
        .find_by_id(id)
        .await?
        .map(|user| AuthorView {
            id: user.id,
            username: user.username,
        }))
}

pub async fn comment_view(state: &AppState, comment: CommentRow) -> ApiResult<CommentView> {
    Ok(CommentView {
        author: author(state, comment.user_id).await?,
        comment,
    })
}

// ============================================================================
// Input Validation
// ============================================================================

pub const MAX_USERNAME_LEN: usize = 100;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LIMIT: u64 = 100;
pub const DEFAULT_LIMIT: u64 = 10;

/// Unwrap a JSON body, mapping any rejection to 400
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest("Invalid request format".into())
    })
}

/// Parse a numeric path ID
pub fn parse_id(raw: &str, kind: ResourceKind) -> ApiResult<u64> {
    raw.parse().map_err(|_| {
        ApiError::BadRequest(match kind {
            ResourceKind::Post => "Invalid post ID".into(),
            ResourceKind::Comment => "Invalid comment ID".into(),
        })
    })
}

pub fn validate_username(username: &str) -> ApiResult<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ApiError::BadRequest(format!(
            "Username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::BadRequest(
            "Username must not contain whitespace".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ApiResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid email address".into()))
    }
}

pub fn validate_title(title: &str) -> ApiResult<()> {
    let len = title.trim().chars().count();
    if len == 0 || title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::BadRequest(format!(
            "Title must be between 1 and {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("Content must not be empty".into()));
    }
    Ok(())
}

/// Normalize `page` / `limit` query values; bad values fall back to defaults
pub fn pagination(page: Option<&str>, limit: Option<&str>) -> (u64, u64) {
    let page = page
        .and_then(|p| p.parse::<u64>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1);
    let limit = limit
        .and_then(|l| l.parse::<u64>().ok())
        .filter(|&l| l >= 1)
        .map_or(DEFAULT_LIMIT, |l| l.min(MAX_LIMIT));
    (page, limit)
}

/// Map an ownership-check failure to a resource-specific API error
pub fn ownership_error(err: AuthError, kind: ResourceKind) -> ApiError {
    match (err, kind) {
        (AuthError::NotFound(_), ResourceKind::Post) => ApiError::NotFound("Post not found"),
        (AuthError::NotFound(_), ResourceKind::Comment) => ApiError::NotFound("Comment not found"),
        (AuthError::Forbidden, ResourceKind::Post) => {
            ApiError::Forbidden("You are not the author of this post")
        }
        (AuthError::Forbidden, ResourceKind::Comment) => {
            ApiError::Forbidden("You are not the author of this comment")
        }
        (other, _) => other.into(),
    }
}
