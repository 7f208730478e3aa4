//! Repository traits
//!
//! Define async repository interfaces for storage operations.

use async_trait::async_trait;
use quill_types::{ResourceRef, UserId};

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user. Fails with `Conflict` on a taken username or email.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by ID
    async fn find_by_id(&self, id: u64) -> DbResult<Option<PostRow>>;

    /// List posts, newest first
    async fn list(&self, offset: usize, limit: usize) -> DbResult<Vec<PostRow>>;

    /// Count all posts
    async fn count(&self) -> DbResult<u64>;

    /// Create a new post
    async fn create(&self, post: CreatePost) -> DbResult<PostRow>;

    /// Apply a partial update
    async fn update(&self, id: u64, update: UpdatePost) -> DbResult<PostRow>;

    /// Delete a post
    async fn delete(&self, id: u64) -> DbResult<()>;
}

/// Create post input
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub user_id: UserId,
}

/// Partial post update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePost {
    /// True when nothing would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment by ID
    async fn find_by_id(&self, id: u64) -> DbResult<Option<CommentRow>>;

    /// All comments on a post, newest first
    async fn find_by_post_id(&self, post_id: u64) -> DbResult<Vec<CommentRow>>;

    /// Create a new comment. Fails with [`DbError::NotFound`] if the post
    /// does not exist at the time of the insert.
    ///
    /// [`DbError::NotFound`]: crate::DbError::NotFound
    async fn create(&self, comment: CreateComment) -> DbResult<CommentRow>;

    /// Delete a comment
    async fn delete(&self, id: u64) -> DbResult<()>;

    /// Delete every comment on a post, returning how many were removed
    async fn delete_by_post_id(&self, post_id: u64) -> DbResult<u64>;
}

/// Create comment input
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub content: String,
    pub user_id: UserId,
    pub post_id: u64,
}

/// Resource ownership lookup
///
/// Answers are always read from the backing store; callers must not cache them
/// across requests.
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// Owner of the referenced resource, `None` if it does not exist
    async fn find_owner(&self, resource: ResourceRef) -> DbResult<Option<UserId>>;
}
