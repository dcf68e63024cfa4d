//! Access/refresh token issuance and verification

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_types::{Role, TokenPair, UserId};

use crate::{AuthConfig, AuthError};

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: Role,
    /// Unique token ID; makes every minted token distinct
    pub jti: String,
    /// Issued at timestamp (seconds)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl TokenClaims {
    fn new(
        user_id: UserId,
        role: Role,
        email: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiry_from(now, ttl)?.timestamp(),
        })
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Get the user ID from the subject claim
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }
}

/// A verified refresh token together with its plaintext.
///
/// The session manager needs the plaintext to find the stored row.
#[derive(Clone)]
pub struct RefreshGrant {
    pub claims: TokenClaims,
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshGrant")
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}

/// Which of the two token kinds an operation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Clone)]
struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKey {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Token issuer
///
/// Signs access tokens and refresh tokens with two distinct HS256 secrets
/// taken from [`AuthConfig`] at construction.
#[derive(Clone)]
pub struct TokenIssuer {
    access: SigningKey,
    refresh: SigningKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Create an issuer from validated configuration
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Lifetimes are exact; no clock tolerance past `exp`
        validation.leeway = 0;

        Self {
            access: SigningKey::new(&config.access_secret, config.access_token_ttl),
            refresh: SigningKey::new(&config.refresh_secret, config.refresh_token_ttl),
            validation,
        }
    }

    /// Issue a fresh access/refresh token pair
    pub fn issue(&self, user_id: UserId, role: Role, email: &str) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access_claims = TokenClaims::new(user_id, role, email, now, self.access.ttl)?;
        let refresh_claims = TokenClaims::new(user_id, role, email, now, self.refresh.ttl)?;

        let access_token = self.sign(TokenKind::Access, &access_claims)?;
        let refresh_token = self.sign(TokenKind::Refresh, &refresh_claims)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate an access token and return its claims
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify(TokenKind::Access, token)
    }

    /// Validate a refresh token and return its claims with the plaintext
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshGrant, AuthError> {
        let claims = self.verify(TokenKind::Refresh, token)?;
        Ok(RefreshGrant {
            claims,
            refresh_token: token.to_string(),
        })
    }

    /// Access token lifetime
    pub fn access_token_ttl(&self) -> Duration {
        self.access.ttl
    }

    /// Refresh token lifetime
    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh.ttl
    }

    fn key(&self, kind: TokenKind) -> &SigningKey {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn sign(&self, kind: TokenKind, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key(kind).encoding).map_err(|e| {
            tracing::error!(kind = %kind, "Failed to sign token: {}", e);
            AuthError::Internal("Failed to sign token".to_string())
        })
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.key(kind).decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(kind = %kind, "Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        let claims = token_data.claims;

        if claims.user_id().is_none() {
            tracing::debug!(kind = %kind, "Token subject is not a user id");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}

/// `now + ttl` as a timestamp
pub(crate) fn expiry_from(
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<DateTime<Utc>, AuthError> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AuthError::Configuration("token lifetime out of range".to_string()))
}
