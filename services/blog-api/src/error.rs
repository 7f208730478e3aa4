//! Error types for the Blog API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_auth_core::AuthError;
use quill_db::DbError;
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Auth(e) => StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Database(DbError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(DbError::Conflict(_)) => StatusCode::BAD_REQUEST,
            Self::Database(DbError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Auth(e) => e.error_code(),
            Self::Database(DbError::NotFound) => "NOT_FOUND",
            Self::Database(DbError::Conflict(_)) => "ALREADY_EXISTS",
            Self::Database(DbError::Backend(_)) => "DATABASE_ERROR",
        }
    }

    fn is_internal(&self) -> bool {
        match self {
            Self::Auth(e) => e.is_internal(),
            Self::Database(e) => matches!(e, DbError::Backend(_)),
            _ => false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Token failure causes never reach the client
        let this = match self {
            Self::Auth(e) => Self::Auth(e.at_gate()),
            other => other,
        };

        let status = this.status_code();
        let code = this.error_code();

        let message = if this.is_internal() {
            tracing::error!(error = ?this, "Internal API error");
            "internal server error".to_string()
        } else {
            this.to_string()
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
