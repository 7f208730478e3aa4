//! Quill Blog API
//!
//! REST service for user accounts, posts and comments. Reads are open to
//! anonymous callers; writes need a bearer token, and changing or deleting a
//! post or comment needs its author's token.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/auth/register` - Create an account
//! - `POST /api/v1/auth/login` - Exchange credentials for a token
//! - `GET /api/v1/auth/profile` - Current user
//! - `GET /api/v1/posts` - List posts (paginated)
//! - `GET /api/v1/posts/{id}` - Get a post with its comments
//! - `POST /api/v1/posts` - Create a post
//! - `PUT /api/v1/posts/{id}` - Update own post
//! - `DELETE /api/v1/posts/{id}` - Delete own post
//! - `GET /api/v1/comments/post/{post_id}` - Comments on a post
//! - `POST /api/v1/comments` - Comment on a post
//! - `DELETE /api/v1/comments/{id}` - Delete own comment
//! - `GET /health` - Liveness probe

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
