//! Error types for the gate and extractors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_auth_core::AuthError;

/// Rejections produced at the auth gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// No usable credential, or a credential that failed validation.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated, but not allowed.
    #[error("forbidden")]
    Forbidden,

    /// Internal error during auth processing.
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl GateError {
    /// HTTP status for this rejection.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AuthError> for GateError {
    fn from(err: AuthError) -> Self {
        match err.at_gate() {
            AuthError::Forbidden => Self::Forbidden,
            e if e.is_internal() => Self::Internal(e.to_string()),
            _ => Self::Unauthenticated,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Auth gate failure");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": message,
            }
        });

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_collapse_to_unauthenticated() {
        for err in [
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::Unauthenticated,
        ] {
            assert_eq!(GateError::from(err), GateError::Unauthenticated);
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GateError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(GateError::from(AuthError::Forbidden).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            GateError::from(AuthError::Internal("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_rendered() {
        let response = GateError::Internal("db exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
