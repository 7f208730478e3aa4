//! Application state

use std::sync::Arc;
use std::time::Duration;

use quill_auth_core::{AuthError, AuthService};
use quill_db::memory::{MemoryOwnershipRepository, MemoryUserRepository};
use quill_db::Repositories;

use crate::config::Config;

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl = AuthService<MemoryUserRepository, MemoryOwnershipRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for credentials, tokens and ownership checks
    pub auth: Arc<AuthServiceImpl>,
    /// Repositories
    pub repos: Repositories,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state over the given repositories
    pub fn new(repos: Repositories, config: Config) -> Result<Self, AuthError> {
        let auth = AuthService::new(
            config.auth.clone(),
            Arc::new(repos.users.clone()),
            Arc::new(repos.ownership.clone()),
        )?;

        Ok(Self {
            auth: Arc::new(auth),
            repos,
            config: Arc::new(config),
        })
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> Duration {
        self.config.request_timeout
    }
}
