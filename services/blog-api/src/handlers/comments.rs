//! Comment handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use quill_axum::RequireAuth;
use quill_db::{CommentRepository, CreateComment, DbError, PostRepository};
use quill_types::{ResourceKind, ResourceRef};
use serde::Deserialize;

use super::shared::{
    comment_view, created, json_body, ok, ok_empty, ownership_error, parse_id, validate_content,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: u64,
}

async fn ensure_post_exists(state: &AppState, post_id: u64) -> ApiResult<()> {
    state
        .repos
        .posts
        .find_by_id(post_id)
        .await?
        .map(|_| ())
        .ok_or(ApiError::NotFound("Post not found"))
}

/// GET /api/v1/comments/post/{post_id}
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, ResourceKind::Post)?;
    ensure_post_exists(&state, post_id).await?;

    let mut comments = Vec::new();
    for comment in state.repos.comments.find_by_post_id(post_id).await? {
        comments.push(comment_view(&state, comment).await?);
    }

    Ok(ok("Comments retrieved successfully", comments))
}

/// POST /api/v1/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: RequireAuth,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let req = json_body(body)?;
    validate_content(&req.content)?;
    ensure_post_exists(&state, req.post_id).await?;

    let comment = state
        .repos
        .comments
        .create(CreateComment {
            content: req.content,
            user_id: auth.user_id(),
            post_id: req.post_id,
        })
        .await
        .map_err(|e| match e {
            // Post removed since the existence check
            DbError::NotFound => ApiError::NotFound("Post not found"),
            other => ApiError::from(other),
        })?;

    tracing::info!(
        comment_id = comment.id,
        post_id = comment.post_id,
        user_id = %auth.user_id(),
        "Comment created"
    );

    Ok(created(
        "Comment created successfully",
        comment_view(&state, comment).await?,
    ))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, ResourceKind::Comment)?;
    state
        .auth
        .authorize_owner(Some(&auth.principal), ResourceRef::comment(id))
        .await
        .map_err(|e| ownership_error(e, ResourceKind::Comment))?;

    state.repos.comments.delete(id).await?;
    tracing::info!(comment_id = id, user_id = %auth.user_id(), "Comment deleted");

    Ok(ok_empty("Comment deleted successfully"))
}
