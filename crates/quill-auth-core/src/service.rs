//! Auth service - ties together hashing, token issuance/validation and
//! ownership checks over the repository traits

use quill_db::{CreateUser, OwnershipRepository, UserRepository, UserRow};
use quill_types::{Principal, ResourceRef};
use std::sync::Arc;

use crate::{
    AuthConfig, AuthError, CredentialHasher, OwnershipAuthorizer, TokenIssuer, TokenValidator,
};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated user
    pub user: UserRow,
    /// Freshly issued bearer token
    pub token: String,
}

/// Authentication service
///
/// Provides unified interface for:
/// - Registration (secret policy + hashing + persistence)
/// - Login (credential lookup + verification + token issuance)
/// - Token validation
/// - Ownership checks for mutating operations
pub struct AuthService<U: UserRepository, O: OwnershipRepository> {
    config: AuthConfig,
    hasher: Arc<CredentialHasher>,
    issuer: TokenIssuer,
    validator: Arc<TokenValidator>,
    ownership: OwnershipAuthorizer<O>,
    user_repo: Arc<U>,
    /// Verified against when the username is unknown so that login takes the
    /// same time whether or not the account exists
    dummy_hash: Arc<str>,
}

impl<U: UserRepository, O: OwnershipRepository> AuthService<U, O> {
    /// Create a new auth service
    pub fn new(config: AuthConfig, user_repo: Arc<U>, ownership_repo: Arc<O>) -> Result<Self, AuthError> {
        let hasher = CredentialHasher::new(config.secret_policy.clone(), config.hash_cost)?;
        let dummy_hash = hasher.hash(&"x".repeat(config.secret_policy.min_length.max(1)))?;

        Ok(Self {
            issuer: TokenIssuer::from_config(&config)?,
            validator: Arc::new(TokenValidator::from_config(&config)?),
            hasher: Arc::new(hasher),
            ownership: OwnershipAuthorizer::new(ownership_repo),
            user_repo,
            dummy_hash: Arc::from(dummy_hash),
            config,
        })
    }

    /// Shared token validator, for request gates
    pub fn validator(&self) -> Arc<TokenValidator> {
        Arc::clone(&self.validator)
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Register a new user
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        secret: &str,
    ) -> Result<UserRow, AuthError> {
        // Cheap policy check before any lookups or hashing
        self.hasher.policy().check(secret)?;

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AuthError::AlreadyExists("username"));
        }
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AuthError::AlreadyExists("email"));
        }

        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {}", e);
                AuthError::Internal("failed to process password".to_string())
            })??;

        let user = self
            .user_repo
            .create(CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Log in with username and secret, returning a fresh token
    pub async fn login(&self, username: &str, secret: &str) -> Result<LoginOutcome, AuthError> {
        let user = self.user_repo.find_by_username(username).await?;

        let stored_hash: Arc<str> = match &user {
            Some(u) => Arc::from(u.password_hash.as_str()),
            None => Arc::clone(&self.dummy_hash),
        };

        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored_hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {}", e);
                AuthError::Internal("failed to process login".to_string())
            })?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::debug!(username = %username, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.issuer.issue(user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome { user, token })
    }

    // =========================================================================
    // Tokens and ownership
    // =========================================================================

    /// Validate a bearer token and return its principal
    pub fn validate_token(&self, token: &str) -> Result<Principal, AuthError> {
        self.validator.validate(token).map(|claims| claims.principal())
    }

    /// Check that the principal owns the resource, reading the owner fresh
    pub async fn authorize_owner(
        &self,
        principal: Option<&Principal>,
        resource: ResourceRef,
    ) -> Result<(), AuthError> {
        self.ownership.check(principal, resource).await
    }
}

impl<U: UserRepository, O: OwnershipRepository> std::fmt::Debug for AuthService<U, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
