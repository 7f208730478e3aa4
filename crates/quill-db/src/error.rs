//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique constraint violated
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// Backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;
