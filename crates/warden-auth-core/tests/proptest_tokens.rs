//! Property-based tests for token issuance and verification
//!
//! These tests verify:
//! - Issued tokens verify back to the same subject, email and role
//! - Access and refresh tokens are never accepted in each other's place
//! - Malformed tokens never cause panics
//! - The refresh token digest is stable and bcrypt-sized

use proptest::prelude::*;
use warden_auth_core::{token_digest, AuthConfig, AuthError, TokenIssuer};
use warden_types::{Role, UserId};

fn issuer() -> TokenIssuer {
    let config = AuthConfig::try_new(
        "proptest-access-secret-0123456789abcdef",
        "proptest-refresh-secret-0123456789abcdef",
    )
    .unwrap();
    TokenIssuer::new(&config)
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Regular), Just(Role::Admin)]
}

fn arb_email() -> impl Strategy<Value = String> {
    "[a-z0-9_.+-]{1,20}@[a-z0-9-]{1,15}\\.[a-z]{2,4}"
}

/// Generate malformed token strings
fn arb_malformed_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // No dots
        "[a-zA-Z0-9_-]{0,80}",
        // Three segments of junk
        "[a-zA-Z0-9_-]{1,30}\\.[a-zA-Z0-9_-]{1,30}\\.[a-zA-Z0-9_-]{1,30}",
        // Too many segments
        "[a-zA-Z0-9_-]{5,10}(\\.[a-zA-Z0-9_-]{5,10}){3,5}",
        // Empty parts
        Just("..".to_string()),
        Just(".".to_string()),
        Just(String::new()),
        // Arbitrary printable characters
        "[ -~]{0,120}",
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: claims survive a sign/verify roundtrip
    #[test]
    fn prop_issued_tokens_roundtrip(id in any::<i64>(), email in arb_email(), role in arb_role()) {
        let issuer = issuer();
        let pair = issuer.issue(UserId(id), role, &email).unwrap();

        let access = issuer.verify_access(&pair.access_token).unwrap();
        prop_assert_eq!(access.user_id(), Some(UserId(id)));
        prop_assert_eq!(&access.email, &email);
        prop_assert_eq!(access.role, role);

        let grant = issuer.verify_refresh(&pair.refresh_token).unwrap();
        prop_assert_eq!(grant.claims.user_id(), Some(UserId(id)));
        prop_assert_eq!(grant.claims.role, role);
        prop_assert_ne!(access.jti, grant.claims.jti);
    }

    /// Property: a token is only accepted by the verifier of its own kind
    #[test]
    fn prop_token_kinds_never_cross(id in any::<i64>(), role in arb_role()) {
        let issuer = issuer();
        let pair = issuer.issue(UserId(id), role, "x@example.com").unwrap();

        prop_assert!(matches!(
            issuer.verify_access(&pair.refresh_token),
            Err(AuthError::InvalidToken)
        ));
        prop_assert!(matches!(
            issuer.verify_refresh(&pair.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    /// Property: malformed tokens are rejected without panicking
    #[test]
    fn prop_malformed_tokens_rejected(token in arb_malformed_token()) {
        let issuer = issuer();
        prop_assert!(issuer.verify_access(&token).is_err());
        prop_assert!(issuer.verify_refresh(&token).is_err());
    }

    /// Property: the digest is deterministic, hex and short enough for bcrypt
    #[test]
    fn prop_token_digest_shape(token in "[ -~]{0,600}") {
        let digest = token_digest(&token);
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
        prop_assert_eq!(digest, token_digest(&token));
    }
}
