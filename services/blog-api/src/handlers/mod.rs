//! HTTP handlers

mod auth;
mod comments;
mod health;
mod posts;
mod shared;

pub use auth::{login, profile, register};
pub use comments::{create_comment, delete_comment, list_comments};
pub use health::health;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use shared::{ApiResponse, AuthorView, CommentView, PostView, UserView};
