//! Quill DB - Persistence abstractions
//!
//! Repository traits consumed by the auth core and the blog service, plus a
//! `dashmap`-backed in-memory implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_db::{memory::Repositories, UserRepository};
//!
//! let repos = Repositories::new();
//! let user = repos.users.find_by_username("alice").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::Repositories;
pub use models::*;
pub use repo::*;
