//! Signed identity tokens
//!
//! Tokens are HS256 JWTs whose claims carry the user ID, the display name and
//! whole-second UTC issue/expiry timestamps. They are stateless: any process
//! holding the signing key can validate them without a session store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use quill_types::{Principal, UserId};
use serde::{Deserialize, Serialize};

use crate::{AuthConfig, AuthError, SigningKey};

/// Claims embedded in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID
    pub user_id: UserId,
    /// Principal display name
    pub username: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Check whether the claims are expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Issue time
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Expiry time
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The principal these claims identify
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.username.clone())
    }
}

/// Mints signed tokens
#[derive(Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    lifetime: Duration,
    header: Header,
}

impl TokenIssuer {
    /// Create an issuer. The lifetime must be at least one hour.
    pub fn new(key: SigningKey, lifetime_hours: u32) -> Result<Self, AuthError> {
        if lifetime_hours == 0 {
            return Err(AuthError::Configuration(
                "token lifetime must be a positive number of hours".to_string(),
            ));
        }
        Ok(Self {
            key,
            lifetime: Duration::hours(i64::from(lifetime_hours)),
            header: Header::new(Algorithm::HS256),
        })
    }

    /// Create an issuer from the auth config
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(config.signing_key()?, config.token_lifetime_hours)
    }

    /// Configured token lifetime
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token valid from now for the configured lifetime
    pub fn issue(&self, user_id: UserId, username: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, username, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        user_id: UserId,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            iat,
            exp: iat + self.lifetime.num_seconds(),
        };

        encode(&self.header, &claims, self.key.encoding_key()).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AuthError::Internal("failed to sign token".to_string())
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime_hours", &self.lifetime.num_hours())
            .finish_non_exhaustive()
    }
}

/// Validates tokens minted by a [`TokenIssuer`] sharing the same key
#[derive(Clone)]
pub struct TokenValidator {
    key: SigningKey,
    validation: Validation,
}

impl TokenValidator {
    /// Create a validator for the given key
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked here against an explicit clock, with no leeway
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self { key, validation }
    }

    /// Create a validator from the auth config
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::new(config.signing_key()?))
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// Checks run in order: structure, signature, expiry. Claims are only
    /// decoded once the signature has been verified.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, self.key.decoding_key(), &self.validation).map_err(
            |e| {
                tracing::debug!("Token validation failed: {}", e);
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::InvalidSignature
                    }
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::MalformedToken,
                }
            },
        )?;

        let claims = data.claims;

        if claims.exp <= claims.iat {
            tracing::debug!(user_id = %claims.user_id, "Token expiry precedes issue time");
            return Err(AuthError::MalformedToken);
        }

        if claims.is_expired_at(now) {
            tracing::debug!(user_id = %claims.user_id, exp = claims.exp, "Token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret-that-is-long-enough";

    fn pair(hours: u32) -> (TokenIssuer, TokenValidator) {
        let key = SigningKey::new(SECRET).unwrap();
        (
            TokenIssuer::new(key.clone(), hours).unwrap(),
            TokenValidator::new(key),
        )
    }

    #[test]
    fn test_issue_then_validate() {
        let (issuer, validator) = pair(24);
        let token = issuer.issue(UserId(5), "alice").unwrap();
        let claims = validator.validate(&token).unwrap();
        assert_eq!(claims.user_id, UserId(5));
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.principal(), Principal::new(UserId(5), "alice"));
    }

    #[test]
    fn test_zero_lifetime_rejected() {
        let key = SigningKey::new(SECRET).unwrap();
        assert!(matches!(
            TokenIssuer::new(key, 0),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let (issuer, validator) = pair(2);
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let token = issuer.issue_at(UserId(1), "bob", issued).unwrap();

        let just_before = issued + Duration::hours(2) - Duration::seconds(1);
        assert!(validator.validate_at(&token, just_before).is_ok());

        let at_expiry = issued + Duration::hours(2);
        assert_eq!(
            validator.validate_at(&token, at_expiry),
            Err(AuthError::TokenExpired)
        );

        let after = issued + Duration::hours(2) + Duration::seconds(1);
        assert_eq!(
            validator.validate_at(&token, after),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_wrong_key_is_signature_error() {
        let (issuer, _) = pair(1);
        let other = TokenValidator::new(SigningKey::new("another-secret-of-sufficient-length!").unwrap());
        let token = issuer.issue(UserId(1), "bob").unwrap();
        assert_eq!(other.validate(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        // An expired token under a foreign key must report the signature,
        // not the expiry: nothing inside it is trusted yet.
        let (issuer, _) = pair(1);
        let other = TokenValidator::new(SigningKey::new("another-secret-of-sufficient-length!").unwrap());
        let issued = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let token = issuer.issue_at(UserId(1), "bob", issued).unwrap();
        assert_eq!(other.validate(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let (_, validator) = pair(1);
        for token in ["", "abc", "a.b", "a.b.c", "...", "not a token at all"] {
            assert_eq!(
                validator.validate(token),
                Err(AuthError::MalformedToken),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_claims_timestamps() {
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let claims = Claims {
            user_id: UserId(1),
            username: "bob".to_string(),
            iat: issued.timestamp(),
            exp: issued.timestamp() + 60,
        };
        assert_eq!(claims.issued_at(), issued);
        assert_eq!(claims.expires_at(), issued + Duration::seconds(60));
        assert!(!claims.is_expired_at(issued + Duration::seconds(59)));
        assert!(claims.is_expired_at(issued + Duration::seconds(60)));
    }
}
