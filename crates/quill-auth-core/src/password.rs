//! Password hashing with Argon2id
//!
//! Hashes are stored in PHC string format, so the salt and cost parameters
//! travel with the hash and older hashes keep verifying after a cost change.

use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};

use crate::{AuthError, HashCost, SecretPolicy};

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Turns plaintext secrets into storable hashes and verifies them
#[derive(Clone)]
pub struct CredentialHasher {
    policy: SecretPolicy,
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with the given policy and Argon2 cost
    pub fn new(policy: SecretPolicy, cost: HashCost) -> Result<Self, AuthError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::Configuration(format!("invalid argon2 params: {e}")))?;
        Ok(Self {
            policy,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// The strength policy applied by [`hash`](Self::hash)
    pub fn policy(&self) -> &SecretPolicy {
        &self.policy
    }

    /// Hash a secret after checking it against the strength policy.
    ///
    /// Every call uses a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        self.policy.check(secret)?;

        let mut salt_bytes = [0u8; SALT_LEN];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| {
            tracing::error!("Failed to generate salt: {}", e);
            AuthError::Internal("failed to generate salt".to_string())
        })?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
            tracing::error!("Failed to encode salt: {}", e);
            AuthError::Internal("failed to encode salt".to_string())
        })?;

        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AuthError::Internal("failed to hash password".to_string())
            })?;
        Ok(hash.to_string())
    }

    /// Verify a secret against a stored hash.
    ///
    /// Returns `false` on mismatch and on a stored hash that cannot be parsed.
    /// The digest comparison is constant-time.
    pub fn verify(&self, secret: &str, hashed: &str) -> bool {
        match PasswordHash::new(hashed) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is not a valid PHC string: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
