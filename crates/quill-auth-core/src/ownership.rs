//! Resource-ownership authorization

use std::sync::Arc;

use quill_db::OwnershipRepository;
use quill_types::{Principal, ResourceRef, UserId};

use crate::AuthError;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// `Deny` becomes [`AuthError::Forbidden`]
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AuthError::Forbidden),
        }
    }
}

/// Allow iff a principal is present and is the recorded owner.
pub fn authorize(principal: Option<&Principal>, owner_id: UserId) -> Decision {
    match principal {
        Some(p) if p.is(owner_id) => Decision::Allow,
        _ => Decision::Deny,
    }
}

/// Ownership checks backed by a fresh owner lookup on every call
pub struct OwnershipAuthorizer<O: OwnershipRepository> {
    repo: Arc<O>,
}

impl<O: OwnershipRepository> Clone for OwnershipAuthorizer<O> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<O: OwnershipRepository> OwnershipAuthorizer<O> {
    pub fn new(repo: Arc<O>) -> Self {
        Self { repo }
    }

    /// Load the resource's owner and decide.
    ///
    /// A missing resource is reported as `NotFound` before any ownership
    /// decision is made.
    pub async fn check(
        &self,
        principal: Option<&Principal>,
        resource: ResourceRef,
    ) -> Result<(), AuthError> {
        let owner = self
            .repo
            .find_owner(resource)
            .await?
            .ok_or_else(|| AuthError::NotFound(resource.kind.to_string()))?;

        let decision = authorize(principal, owner);
        if !decision.is_allowed() {
            tracing::info!(
                resource = %resource,
                owner_id = %owner,
                user_id = ?principal.map(|p| p.id),
                "Ownership check denied"
            );
        }
        decision.into_result()
    }
}
