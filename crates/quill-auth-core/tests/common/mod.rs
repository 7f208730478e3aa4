//! Common test utilities for quill-auth-core integration tests

#![allow(dead_code)]

use quill_auth_core::{AuthConfig, CredentialHasher, HashCost, SigningKey, TokenIssuer, TokenValidator};

pub const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";

/// Argon2 parameters cheap enough for property tests
pub fn fast_cost() -> HashCost {
    HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(TEST_SECRET)
        .expect("test secret is long enough")
        .with_hash_cost(fast_cost())
}

pub fn fast_hasher() -> CredentialHasher {
    let config = test_config();
    CredentialHasher::new(config.secret_policy, config.hash_cost).expect("valid cost")
}

pub fn token_pair(hours: u32) -> (TokenIssuer, TokenValidator) {
    let key = SigningKey::new(TEST_SECRET).expect("valid key");
    (
        TokenIssuer::new(key.clone(), hours).expect("positive lifetime"),
        TokenValidator::new(key),
    )
}
