//! Password and refresh token hashing
//!
//! Passwords and refresh tokens are stored as salted bcrypt digests and
//! checked with `verify`, never compared as plain strings.
//!
//! bcrypt only looks at the first 72 bytes of its input. Signed refresh
//! tokens are much longer and share a long common prefix (header and the
//! leading claims), so they are reduced to a SHA-256 hex digest before being
//! handed to bcrypt.

use sha2::{Digest, Sha256};

use crate::AuthError;

/// Salted, adaptive one-way hasher (bcrypt)
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Lowest work factor bcrypt accepts
    pub const MIN_COST: u32 = 4;
    /// Highest work factor bcrypt accepts
    pub const MAX_COST: u32 = 31;

    /// Create a hasher with the given work factor.
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if the cost is outside 4..=31.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(Self::MIN_COST..=Self::MAX_COST).contains(&cost) {
            return Err(AuthError::Configuration(format!(
                "bcrypt cost must be between {} and {}, got {cost}",
                Self::MIN_COST,
                Self::MAX_COST
            )));
        }
        Ok(Self { cost })
    }

    /// Work factor
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password. CPU-bound; call through [`blocking`] from async code.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            tracing::error!("bcrypt hashing failed: {}", e);
            AuthError::Internal("Failed to hash credential".to_string())
        })
    }

    /// Verify a password against a stored digest.
    ///
    /// A digest that is not valid bcrypt never verifies.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored digest could not be verified: {}", e);
                false
            }
        }
    }

    /// Hash a refresh token for storage
    pub fn hash_token(&self, token: &str) -> Result<String, AuthError> {
        self.hash(&token_digest(token))
    }

    /// Verify a refresh token against a stored digest
    pub fn verify_token(&self, token: &str, digest: &str) -> bool {
        self.verify(&token_digest(token), digest)
    }
}

/// SHA-256 hex digest of a token (64 chars, within bcrypt's input limit)
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Run CPU-bound work (bcrypt) on the blocking thread pool
pub async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("Blocking task failed: {}", e);
        AuthError::Internal("Background task failed".to_string())
    })
}
