//! Configuration types for the auth core

use chrono::Duration;

use crate::{AuthError, SigningKey};

/// Minimum strength rules applied to a secret before it is hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPolicy {
    /// Minimum length in characters
    pub min_length: usize,
    /// Maximum length in characters (bounds hashing cost)
    pub max_length: usize,
    /// Whether secrets made only of digits are accepted
    pub allow_numeric_only: bool,
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 100,
            allow_numeric_only: false,
        }
    }
}

impl SecretPolicy {
    /// Check a secret against the policy
    pub fn check(&self, secret: &str) -> Result<(), AuthError> {
        let len = secret.chars().count();
        if len < self.min_length {
            return Err(AuthError::WeakSecret(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }
        if len > self.max_length {
            return Err(AuthError::WeakSecret(format!(
                "password must be at most {} characters",
                self.max_length
            )));
        }
        if secret.trim().is_empty() {
            return Err(AuthError::WeakSecret(
                "password must not be blank".to_string(),
            ));
        }
        if !self.allow_numeric_only && secret.chars().all(|c| c.is_ascii_digit()) {
            return Err(AuthError::WeakSecret(
                "password must not be purely numeric".to_string(),
            ));
        }
        Ok(())
    }
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of iterations
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Auth core configuration
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret used to sign and verify tokens
    pub signing_secret: String,
    /// Token lifetime in whole hours
    pub token_lifetime_hours: u32,
    /// Secret strength policy
    pub secret_policy: SecretPolicy,
    /// Password hashing cost
    pub hash_cost: HashCost,
}

impl AuthConfig {
    /// Default token lifetime
    pub const DEFAULT_TOKEN_LIFETIME_HOURS: u32 = 24;

    /// Create a new auth config, validating the signing secret
    pub fn try_new(signing_secret: impl Into<String>) -> Result<Self, AuthError> {
        let signing_secret = signing_secret.into();
        SigningKey::new(&signing_secret)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        Ok(Self {
            signing_secret,
            token_lifetime_hours: Self::DEFAULT_TOKEN_LIFETIME_HOURS,
            secret_policy: SecretPolicy::default(),
            hash_cost: HashCost::default(),
        })
    }

    /// Set token lifetime
    pub fn with_token_lifetime_hours(mut self, hours: u32) -> Self {
        self.token_lifetime_hours = hours;
        self
    }

    /// Set secret policy
    pub fn with_secret_policy(mut self, policy: SecretPolicy) -> Self {
        self.secret_policy = policy;
        self
    }

    /// Set hashing cost
    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Token lifetime as a duration
    pub fn token_lifetime(&self) -> Duration {
        Duration::hours(i64::from(self.token_lifetime_hours))
    }

    /// Build the signing key
    pub fn signing_key(&self) -> Result<SigningKey, AuthError> {
        SigningKey::new(&self.signing_secret).map_err(|e| AuthError::Configuration(e.to_string()))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"<redacted>")
            .field("token_lifetime_hours", &self.token_lifetime_hours)
            .field("secret_policy", &self.secret_policy)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}
