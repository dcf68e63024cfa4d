//! Auth service - ties together token verification and session management
//!
//! This is the surface the transport layer calls. It plays the role of the
//! request guards (verifying the presented access or refresh token) and then
//! delegates to the [`SessionManager`].

use std::sync::Arc;

use warden_db::{RefreshTokenRepository, UserRepository};
use warden_types::{LoginRequest, LogoutResponse, RegisterRequest, TokenPair, UserId};

use crate::{AuthConfig, AuthError, SessionManager, TokenClaims};

/// Authentication service
pub struct AuthService<U: UserRepository, R: RefreshTokenRepository> {
    config: AuthConfig,
    sessions: SessionManager<U, R>,
}

impl<U: UserRepository, R: RefreshTokenRepository> AuthService<U, R> {
    /// Create a new auth service
    pub fn new(
        config: AuthConfig,
        users: Arc<U>,
        refresh_tokens: Arc<R>,
    ) -> Result<Self, AuthError> {
        config.validate()?;
        let sessions = SessionManager::from_config(&config, users, refresh_tokens)?;
        Ok(Self { config, sessions })
    }

    /// Configuration the service was built with
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Underlying session manager
    pub fn sessions(&self) -> &SessionManager<U, R> {
        &self.sessions
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Register a new user
    pub async fn signup(&self, request: RegisterRequest) -> Result<TokenPair, AuthError> {
        self.sessions.signup(request).await
    }

    /// Sign in with email and password
    pub async fn signin(&self, request: LoginRequest) -> Result<TokenPair, AuthError> {
        self.sessions.signin(request).await
    }

    // =========================================================================
    // Token-driven operations
    // =========================================================================

    /// Validate an access token and return its claims
    pub fn authenticate(&self, access_token: &str) -> Result<TokenClaims, AuthError> {
        self.sessions.issuer().verify_access(access_token)
    }

    /// Rotate a refresh token
    ///
    /// The token must carry a valid refresh signature; the user is taken
    /// from its subject.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let grant = self.sessions.issuer().verify_refresh(refresh_token)?;
        let user_id = subject(&grant.claims)?;
        self.sessions.refresh_token(user_id, &grant.refresh_token).await
    }

    /// Log out the session owning `refresh_token`
    ///
    /// Requires a valid access token; the refresh token is matched against
    /// that user's sessions only.
    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<LogoutResponse, AuthError> {
        let claims = self.authenticate(access_token)?;
        self.sessions.logout(subject(&claims)?, refresh_token).await?;
        Ok(LogoutResponse { success: true })
    }

    /// Log out every session of the access token's user
    pub async fn logout_everywhere(&self, access_token: &str) -> Result<u64, AuthError> {
        let claims = self.authenticate(access_token)?;
        self.sessions.revoke_all_sessions(subject(&claims)?).await
    }
}

fn subject(claims: &TokenClaims) -> Result<UserId, AuthError> {
    claims.user_id().ok_or(AuthError::InvalidToken)
}

impl<U: UserRepository, R: RefreshTokenRepository> std::fmt::Debug for AuthService<U, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
