//! Post handlers
//!
//! Reads go through the optional gate: anonymous callers get the same data
//! with `editable: false`. Writes need the required gate, and update/delete
//! additionally need the caller to be the post's author.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use quill_axum::{MaybeAuth, RequireAuth};
use quill_db::{CommentRepository, CreatePost, PostRepository, PostRow, UpdatePost};
use quill_types::{ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};

use super::shared::{
    author, comment_view, created, json_body, ok, ok_empty, ownership_error, pagination,
    parse_id, validate_content, validate_title, PostView,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Empty or missing fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub posts: Vec<PostView>,
    pub pagination: Pagination,
}

async fn post_view(
    state: &AppState,
    viewer: &MaybeAuth,
    post: PostRow,
) -> ApiResult<PostView> {
    Ok(PostView {
        author: author(state, post.user_id).await?,
        editable: viewer.as_ref().is_some_and(|ctx| ctx.is(post.user_id)),
        post,
        comments: None,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/posts
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: MaybeAuth,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (page, limit) = pagination(query.page.as_deref(), query.limit.as_deref());
    let offset = (page - 1).saturating_mul(limit);

    let total = state.repos.posts.count().await?;
    let rows = state
        .repos
        .posts
        .list(usize::try_from(offset).unwrap_or(usize::MAX), limit as usize)
        .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        posts.push(post_view(&state, &viewer, row).await?);
    }

    Ok(ok(
        "Posts retrieved successfully",
        PostList {
            posts,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        },
    ))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeAuth,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, ResourceKind::Post)?;
    let post = state
        .repos
        .posts
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;

    let mut comments = Vec::new();
    for comment in state.repos.comments.find_by_post_id(id).await? {
        comments.push(comment_view(&state, comment).await?);
    }

    let mut view = post_view(&state, &viewer, post).await?;
    view.comments = Some(comments);

    Ok(ok("Post retrieved successfully", view))
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: RequireAuth,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let req = json_body(body)?;
    validate_title(&req.title)?;
    validate_content(&req.content)?;

    let post = state
        .repos
        .posts
        .create(CreatePost {
            title: req.title,
            content: req.content,
            user_id: auth.user_id(),
        })
        .await?;

    tracing::info!(post_id = post.id, user_id = %auth.user_id(), "Post created");

    let view = PostView {
        author: author(&state, post.user_id).await?,
        editable: true,
        post,
        comments: None,
    };
    Ok(created("Post created successfully", view))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, ResourceKind::Post)?;
    state
        .auth
        .authorize_owner(Some(&auth.principal), ResourceRef::post(id))
        .await
        .map_err(|e| ownership_error(e, ResourceKind::Post))?;

    let req = json_body(body)?;
    let update = UpdatePost {
        title: req.title.filter(|t| !t.is_empty()),
        content: req.content.filter(|c| !c.is_empty()),
    };
    if let Some(title) = &update.title {
        validate_title(title)?;
    }
    if let Some(content) = &update.content {
        validate_content(content)?;
    }

    let post = state.repos.posts.update(id, update).await?;

    tracing::info!(post_id = id, user_id = %auth.user_id(), "Post updated");

    let view = PostView {
        author: author(&state, post.user_id).await?,
        editable: true,
        post,
        comments: None,
    };
    Ok(ok("Post updated successfully", view))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, ResourceKind::Post)?;
    state
        .auth
        .authorize_owner(Some(&auth.principal), ResourceRef::post(id))
        .await
        .map_err(|e| ownership_error(e, ResourceKind::Post))?;

    // Post first: once it is gone no new comment can attach to it
    state.repos.posts.delete(id).await?;
    let removed = state.repos.comments.delete_by_post_id(id).await?;

    tracing::info!(post_id = id, comments = removed, user_id = %auth.user_id(), "Post deleted");

    Ok(ok_empty("Post deleted successfully"))
}
