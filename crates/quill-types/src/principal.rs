//! The authenticated identity attached to a single request

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Authenticated caller of one request.
///
/// Built from validated token claims by the auth gate and dropped with the
/// request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user ID
    pub id: UserId,
    /// Display name (the username at the time the token was issued)
    pub display_name: String,
}

impl Principal {
    /// Create a new principal
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Check whether this principal is the given user
    pub fn is(&self, user_id: UserId) -> bool {
        self.id == user_id
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}
