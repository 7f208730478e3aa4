//! Authentication context types.
//!
//! The [`AuthContext`] struct carries the authenticated caller into request
//! handlers.

use std::ops::Deref;

use chrono::{DateTime, Utc};
use quill_auth_core::Claims;
use quill_types::{Principal, UserId};

/// Authenticated caller attached to a request by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Who the caller is.
    pub principal: Principal,
    /// When the presented token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    /// Create a context for a principal.
    #[must_use]
    pub fn new(principal: Principal, expires_at: DateTime<Utc>) -> Self {
        Self {
            principal,
            expires_at,
        }
    }

    /// Build a context from validated token claims.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.principal(), claims.expires_at())
    }

    /// The caller's user ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.principal.id
    }

    /// The caller's display name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.principal.display_name
    }
}

impl Deref for AuthContext {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}
