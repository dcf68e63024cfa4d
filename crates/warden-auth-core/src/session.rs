//! Session management: signup, signin, logout and refresh-token rotation
//!
//! Each login creates one refresh token row holding the bcrypt digest of
//! the refresh token. A refresh replaces the row's digest in place, a logout
//! deletes the row. Signin never prunes older rows, so a user accumulates one
//! row per active login.

use std::sync::Arc;

use chrono::Utc;
use warden_db::{
    CreateRefreshToken, CreateUser, RefreshTokenRepository, RefreshTokenRow, UserRepository,
};
use warden_types::{LoginRequest, RegisterRequest, Role, TokenPair, UserId};

use crate::crypto::{blocking, PasswordHasher};
use crate::token::{expiry_from, TokenIssuer};
use crate::{AuthConfig, AuthError, Resource};

/// Session manager handles credential checks and refresh token lifecycle
pub struct SessionManager<U: UserRepository, R: RefreshTokenRepository> {
    issuer: TokenIssuer,
    hasher: PasswordHasher,
    users: Arc<U>,
    refresh_tokens: Arc<R>,
}

impl<U: UserRepository, R: RefreshTokenRepository> SessionManager<U, R> {
    /// Create a new session manager
    pub fn new(
        issuer: TokenIssuer,
        hasher: PasswordHasher,
        users: Arc<U>,
        refresh_tokens: Arc<R>,
    ) -> Self {
        Self {
            issuer,
            hasher,
            users,
            refresh_tokens,
        }
    }

    /// Create a session manager from configuration
    pub fn from_config(
        config: &AuthConfig,
        users: Arc<U>,
        refresh_tokens: Arc<R>,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        Ok(Self::new(
            TokenIssuer::new(config),
            hasher,
            users,
            refresh_tokens,
        ))
    }

    /// Token issuer used for this manager's sessions
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Register a new user and open their first session
    ///
    /// If the session cannot be opened the new user row is deleted again,
    /// so the email stays free.
    ///
    /// # Errors
    /// `AuthError::Conflict` if the email is already registered.
    pub async fn signup(&self, request: RegisterRequest) -> Result<TokenPair, AuthError> {
        let RegisterRequest {
            email,
            password,
            role,
        } = request;

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Signup rejected: email already registered");
            return Err(AuthError::Conflict);
        }

        let hasher = self.hasher;
        let password_hash = blocking(move || hasher.hash(&password)).await??;
        let role = role.unwrap_or_default();

        // A concurrent signup with the same email surfaces as a unique
        // violation here, which converts to `Conflict`.
        let user = self
            .users
            .create(CreateUser {
                email,
                password_hash,
                role: role.to_string(),
            })
            .await?;

        let user_id = user.user_id();
        let tokens = match self.start_session(user_id, role, &user.email).await {
            Ok(tokens) => tokens,
            Err(e) => {
                // Remove the user again so a retried signup is not a conflict
                tracing::warn!(user_id = %user_id, "Signup failed after user creation");
                if let Err(cleanup) = self.users.delete(user_id.0).await {
                    tracing::error!(user_id = %user_id, "Failed to remove user: {}", cleanup);
                }
                return Err(e);
            }
        };
        tracing::info!(user_id = %user_id, role = %role, "User signed up");

        Ok(tokens)
    }

    /// Authenticate with email and password and open a new session
    ///
    /// Existing sessions of the user are left untouched.
    ///
    /// # Errors
    /// `AuthError::NotFound` for an unknown email, `AuthError::Unauthorized`
    /// for a wrong password.
    pub async fn signin(&self, request: LoginRequest) -> Result<TokenPair, AuthError> {
        let LoginRequest { email, password } = request;

        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            tracing::debug!("Signin rejected: unknown email");
            AuthError::NotFound(Resource::User)
        })?;

        let hasher = self.hasher;
        let digest = user.password_hash.clone();
        let matches = blocking(move || hasher.verify(&password, &digest)).await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "Signin rejected: wrong password");
            return Err(AuthError::Unauthorized);
        }

        let user_id = user.user_id();
        let tokens = self.start_session(user_id, stored_role(&user)?, &user.email).await?;
        tracing::info!(user_id = %user_id, "User signed in");

        Ok(tokens)
    }

    /// End the session the refresh token belongs to
    ///
    /// Deletes exactly the matching row. An unknown token is not an error;
    /// logging out twice succeeds both times.
    pub async fn logout(&self, user_id: UserId, refresh_token: &str) -> Result<(), AuthError> {
        match self.find_session(user_id, refresh_token).await? {
            Some(row) => {
                self.refresh_tokens.delete(row.id).await?;
                tracing::info!(
                    user_id = %user_id,
                    session_id = %row.refresh_token_id(),
                    "Session ended"
                );
            }
            None => {
                tracing::debug!(user_id = %user_id, "Logout with unknown refresh token");
            }
        }

        Ok(())
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The matched row keeps its identity and receives the digest of the new
    /// refresh token, so the presented token can never be used again.
    ///
    /// # Errors
    /// `AuthError::NotFound` if no session matches the token (unknown, already
    /// rotated, logged out, or lost a concurrent rotation) or the user no
    /// longer exists.
    pub async fn refresh_token(
        &self,
        user_id: UserId,
        refresh_token: &str,
    ) -> Result<TokenPair, AuthError> {
        let row = self
            .find_session(user_id, refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %user_id, "Refresh rejected: no matching session");
                AuthError::NotFound(Resource::RefreshToken)
            })?;

        let user = self.users.find_by_id(user_id.0).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Refresh token outlived its user");
            AuthError::NotFound(Resource::User)
        })?;

        let tokens = self
            .issuer
            .issue(user.user_id(), stored_role(&user)?, &user.email)?;
        let new_hash = self.hash_refresh_token(&tokens.refresh_token).await?;
        let expires_at = expiry_from(Utc::now(), self.issuer.refresh_token_ttl())?;

        let rotated = self
            .refresh_tokens
            .rotate(row.id, &row.token_hash, &new_hash, expires_at)
            .await?;
        if !rotated {
            tracing::warn!(
                user_id = %user_id,
                session_id = %row.refresh_token_id(),
                "Refresh token was rotated concurrently"
            );
            return Err(AuthError::NotFound(Resource::RefreshToken));
        }

        tracing::info!(
            user_id = %user_id,
            session_id = %row.refresh_token_id(),
            "Refresh token rotated"
        );
        Ok(tokens)
    }

    /// End every session of a user
    pub async fn revoke_all_sessions(&self, user_id: UserId) -> Result<u64, AuthError> {
        let count = self.refresh_tokens.delete_all_for_user(user_id.0).await?;
        tracing::info!(user_id = %user_id, count, "All sessions ended");
        Ok(count)
    }

    /// Issue a token pair and persist a new refresh token row for it
    async fn start_session(
        &self,
        user_id: UserId,
        role: Role,
        email: &str,
    ) -> Result<TokenPair, AuthError> {
        let tokens = self.issuer.issue(user_id, role, email)?;
        let token_hash = self.hash_refresh_token(&tokens.refresh_token).await?;
        let expires_at = expiry_from(Utc::now(), self.issuer.refresh_token_ttl())?;

        let row = self
            .refresh_tokens
            .create(CreateRefreshToken {
                user_id: user_id.0,
                token_hash,
                expires_at,
            })
            .await?;
        tracing::debug!(
            user_id = %user_id,
            session_id = %row.refresh_token_id(),
            "Session created"
        );

        Ok(tokens)
    }

    /// Find the user's row whose digest verifies against the token
    ///
    /// Scans the rows in order and stops at the first verified match.
    async fn find_session(
        &self,
        user_id: UserId,
        refresh_token: &str,
    ) -> Result<Option<RefreshTokenRow>, AuthError> {
        let rows = self.refresh_tokens.find_by_user_id(user_id.0).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        let hasher = self.hasher;
        let token = refresh_token.to_string();
        blocking(move || {
            rows.into_iter().find(|row| {
                row.user_id == user_id.0 && hasher.verify_token(&token, &row.token_hash)
            })
        })
        .await
    }

    async fn hash_refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let hasher = self.hasher;
        let token = refresh_token.to_string();
        blocking(move || hasher.hash_token(&token)).await?
    }
}

fn stored_role(user: &warden_db::UserRow) -> Result<Role, AuthError> {
    user.role().map_err(|e| {
        tracing::error!(user_id = %user.id, "Stored role is invalid: {}", e);
        AuthError::Internal("Invalid stored role".to_string())
    })
}

impl<U: UserRepository, R: RefreshTokenRepository> std::fmt::Debug for SessionManager<U, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("issuer", &self.issuer)
            .field("bcrypt_cost", &self.hasher.cost())
            .finish_non_exhaustive()
    }
}
