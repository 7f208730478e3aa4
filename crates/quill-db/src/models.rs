//! Stored row models

use chrono::{DateTime, Utc};
use quill_types::UserId;
use serde::Serialize;

/// User row. Carries the credential record (username + password hash).
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post row
#[derive(Debug, Clone, Serialize)]
pub struct PostRow {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment row
#[derive(Debug, Clone, Serialize)]
pub struct CommentRow {
    pub id: u64,
    pub content: String,
    pub user_id: UserId,
    pub post_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
