//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DbResult;
use crate::models::*;

/// User repository trait (the credential store)
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user.
    ///
    /// Fails with `DbError::UniqueViolation` if the email is taken.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Delete a user (and, through the foreign key, their refresh tokens)
    async fn delete(&self, id: i64) -> DbResult<()>;
}

/// Create user input
#[derive(Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Refresh token repository trait
///
/// Every mutation is a single statement, so each one is atomic on its own.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Find all refresh token rows for a user, oldest first
    async fn find_by_user_id(&self, user_id: i64) -> DbResult<Vec<RefreshTokenRow>>;

    /// Create a new refresh token row
    async fn create(&self, token: CreateRefreshToken) -> DbResult<RefreshTokenRow>;

    /// Replace the hash of a row in place.
    ///
    /// Only succeeds while the row still holds `current_hash`; returns
    /// `false` if the row is gone or was rotated by someone else first.
    async fn rotate(
        &self,
        id: i64,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<bool>;

    /// Delete a row. Returns whether a row was deleted.
    async fn delete(&self, id: i64) -> DbResult<bool>;

    /// Delete all rows for a user
    async fn delete_all_for_user(&self, user_id: i64) -> DbResult<u64>;

    /// Delete rows whose refresh token has expired
    async fn delete_expired(&self) -> DbResult<u64>;
}

/// Create refresh token input
#[derive(Clone)]
pub struct CreateRefreshToken {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
