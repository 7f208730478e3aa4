//! Configuration for the Blog API service.

use quill_auth_core::{AuthConfig, HashCost, SecretPolicy};
use std::time::Duration;

/// Blog API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Request timeout for API routes
    pub request_timeout: Duration,
}

impl Config {
    /// Default configuration around an auth config
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            http_port: 8080,
            auth,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080u16)?;

        // Token signing secret (minimum 32 bytes)
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        // Token lifetime (default 24 hours)
        let expire_hours: u32 = parse_or(
            &lookup,
            "JWT_EXPIRE_HOURS",
            AuthConfig::DEFAULT_TOKEN_LIFETIME_HOURS,
        )?;
        if expire_hours == 0 {
            return Err(ConfigError::Invalid("JWT_EXPIRE_HOURS must be positive"));
        }

        // Secret strength policy
        let defaults = SecretPolicy::default();
        let secret_policy = SecretPolicy {
            min_length: parse_or(&lookup, "SECRET_MIN_LENGTH", defaults.min_length)?,
            max_length: parse_or(&lookup, "SECRET_MAX_LENGTH", defaults.max_length)?,
            allow_numeric_only: parse_or(
                &lookup,
                "SECRET_ALLOW_NUMERIC_ONLY",
                defaults.allow_numeric_only,
            )?,
        };
        if secret_policy.min_length == 0 || secret_policy.min_length > secret_policy.max_length {
            return Err(ConfigError::Invalid(
                "SECRET_MIN_LENGTH must be positive and not above SECRET_MAX_LENGTH",
            ));
        }

        // Argon2 cost
        let cost = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&lookup, "ARGON2_M_COST", cost.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_T_COST", cost.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_P_COST", cost.parallelism)?,
        };

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let auth = AuthConfig::try_new(jwt_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_token_lifetime_hours(expire_hours)
            .with_secret_policy(secret_policy)
            .with_hash_cost(hash_cost);

        Ok(Self {
            http_port,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
