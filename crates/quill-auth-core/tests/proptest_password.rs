//! Property-based tests for credential hashing and the secret policy
//!
//! Hashing is deliberately slow, so the hashing properties run few cases.

mod common;

use common::fast_hasher;
use proptest::prelude::*;
use quill_auth_core::{AuthError, SecretPolicy};

fn arb_acceptable_secret() -> impl Strategy<Value = String> {
    "[a-zA-Z!@#%&*]{1}[a-zA-Z0-9!@#%&* ]{5,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Property: a hash verifies its own secret
    #[test]
    fn prop_hash_verifies(secret in arb_acceptable_secret()) {
        let hasher = fast_hasher();
        let hash = hasher.hash(&secret).unwrap();
        prop_assert!(hasher.verify(&secret, &hash));
    }

    /// Property: a hash never verifies a different secret
    #[test]
    fn prop_hash_rejects_other_secret(
        secret in arb_acceptable_secret(),
        other in arb_acceptable_secret(),
    ) {
        prop_assume!(secret != other);
        let hasher = fast_hasher();
        let hash = hasher.hash(&secret).unwrap();
        prop_assert!(!hasher.verify(&other, &hash));
    }
}

proptest! {
    /// Property: secrets shorter than the minimum are rejected
    #[test]
    fn prop_short_secret_rejected(secret in "[a-z]{0,5}") {
        let result = SecretPolicy::default().check(&secret);
        prop_assert!(matches!(result, Err(AuthError::WeakSecret(_))));
    }

    /// Property: secrets longer than the maximum are rejected
    #[test]
    fn prop_long_secret_rejected(secret in "[a-z]{101,160}") {
        let result = SecretPolicy::default().check(&secret);
        prop_assert!(matches!(result, Err(AuthError::WeakSecret(_))));
    }

    /// Property: purely numeric secrets are rejected unless allowed
    #[test]
    fn prop_numeric_secret_policy(secret in "[0-9]{6,30}") {
        prop_assert!(SecretPolicy::default().check(&secret).is_err());

        let lenient = SecretPolicy {
            allow_numeric_only: true,
            ..SecretPolicy::default()
        };
        prop_assert!(lenient.check(&secret).is_ok());
    }

    /// Property: weak secrets are rejected by the hasher before any hashing
    #[test]
    fn prop_hasher_enforces_policy(secret in "[0-9]{0,12}") {
        let hasher = fast_hasher();
        prop_assert!(matches!(hasher.hash(&secret), Err(AuthError::WeakSecret(_))));
    }
}
