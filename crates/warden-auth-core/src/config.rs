//! Configuration types for auth service

use std::time::Duration;

use crate::crypto::PasswordHasher;
use crate::AuthError;

/// Access token lifetime (15 minutes)
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh token lifetime (7 days)
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// bcrypt work factor used for passwords and refresh tokens
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Minimum signing secret length in bytes (256 bits)
pub const MIN_SECRET_LENGTH: usize = 32;

/// Name of the HTTP-only cookie the transport stores the refresh token in
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Max-Age of the refresh cookie; matches the refresh token lifetime
pub const REFRESH_COOKIE_MAX_AGE: Duration = REFRESH_TOKEN_TTL;

/// Auth service configuration
///
/// Built once at process start and handed to the token issuer. Secrets are
/// never read from the environment mid-request.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_secret: String,
    /// HMAC secret for refresh tokens (must differ from the access secret)
    pub refresh_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Create a config with the default lifetimes and cost
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if either secret is shorter than
    /// 32 bytes or both secrets are identical.
    pub fn try_new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let config = Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_token_ttl: ACCESS_TOKEN_TTL,
            refresh_token_ttl: REFRESH_TOKEN_TTL,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Reads `JWT_ACCESS_SECRET`, `JWT_REFRESH_SECRET` and optionally
    /// `ACCESS_TOKEN_TTL_SECS`, `REFRESH_TOKEN_TTL_SECS`, `BCRYPT_COST`.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let access_secret = lookup("JWT_ACCESS_SECRET")
            .ok_or_else(|| AuthError::Configuration("JWT_ACCESS_SECRET is not set".to_string()))?;
        let refresh_secret = lookup("JWT_REFRESH_SECRET").ok_or_else(|| {
            AuthError::Configuration("JWT_REFRESH_SECRET is not set".to_string())
        })?;

        let access_ttl = parse_var(&lookup, "ACCESS_TOKEN_TTL_SECS", ACCESS_TOKEN_TTL.as_secs())?;
        let refresh_ttl =
            parse_var(&lookup, "REFRESH_TOKEN_TTL_SECS", REFRESH_TOKEN_TTL.as_secs())?;
        let bcrypt_cost = parse_var(&lookup, "BCRYPT_COST", u64::from(DEFAULT_BCRYPT_COST))?;
        let bcrypt_cost = u32::try_from(bcrypt_cost)
            .map_err(|_| AuthError::Configuration("BCRYPT_COST is out of range".to_string()))?;

        let config = Self::try_new(access_secret, refresh_secret)?
            .with_access_token_ttl(Duration::from_secs(access_ttl))
            .with_refresh_token_ttl(Duration::from_secs(refresh_ttl))
            .with_bcrypt_cost(bcrypt_cost);
        config.validate()?;
        Ok(config)
    }

    /// Set access token lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    /// Set bcrypt work factor
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Check secrets, lifetimes and cost
    pub fn validate(&self) -> Result<(), AuthError> {
        for (name, secret) in [
            ("access", &self.access_secret),
            ("refresh", &self.refresh_secret),
        ] {
            if secret.len() < MIN_SECRET_LENGTH {
                return Err(AuthError::Configuration(format!(
                    "{name} secret must be at least {MIN_SECRET_LENGTH} bytes"
                )));
            }
        }

        if self.access_secret == self.refresh_secret {
            return Err(AuthError::Configuration(
                "access and refresh secrets must differ".to_string(),
            ));
        }

        if self.access_token_ttl.is_zero() || self.refresh_token_ttl.is_zero() {
            return Err(AuthError::Configuration(
                "token lifetimes must be non-zero".to_string(),
            ));
        }

        PasswordHasher::new(self.bcrypt_cost).map(|_| ())
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, AuthError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AuthError::Configuration(format!("{key} must be an integer"))),
        None => Ok(default),
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}
