//! Auth errors

use thiserror::Error;

/// Authentication and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Secret rejected by the strength policy
    #[error("weak secret: {0}")]
    WeakSecret(String),

    /// Token could not be parsed into the expected structure
    #[error("malformed token")]
    MalformedToken,

    /// Token signature does not match
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// No usable credential was presented
    #[error("authentication required")]
    Unauthenticated,

    /// Invalid credentials (unknown user or wrong password)
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Caller is authenticated but may not act on the resource
    #[error("forbidden")]
    Forbidden,

    /// Username or email is already registered
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// Referenced resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::WeakSecret(_) | Self::MalformedToken | Self::AlreadyExists(_) => 400,
            Self::InvalidSignature
            | Self::TokenExpired
            | Self::Unauthenticated
            | Self::InvalidCredentials => 401,
            Self::Forbidden => 403,
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::WeakSecret(_) => "WEAK_SECRET",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::InvalidSignature => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures produced by token validation
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken | Self::InvalidSignature | Self::TokenExpired
        )
    }

    /// True for errors that must be reported as a generic server error
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_)
        )
    }

    /// Collapse token validation failures into `Unauthenticated`.
    ///
    /// Clients never learn whether a presented token was malformed, forged or
    /// expired; the specific cause stays in the debug log.
    pub fn at_gate(self) -> Self {
        if self.is_token_failure() {
            Self::Unauthenticated
        } else {
            self
        }
    }
}

impl From<quill_db::DbError> for AuthError {
    fn from(err: quill_db::DbError) -> Self {
        match err {
            quill_db::DbError::Conflict(field) => Self::AlreadyExists(field),
            quill_db::DbError::NotFound => Self::NotFound("record".to_string()),
            quill_db::DbError::Backend(_) => {
                tracing::error!("Database error: {}", err);
                Self::Database(err.to_string())
            }
        }
    }
}
