//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! See `schema.sql` at the crate root for the table definitions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use warden_types::{RefreshTokenId, Role, RoleParseError, UserId};

/// User row from the database
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Refresh token row from the database
#[derive(Clone, FromRow)]
pub struct RefreshTokenRow {
    pub id: i64,
    pub user_id: i64,
    /// bcrypt digest of the refresh token; never the token itself
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Parse the stored role
    pub fn role(&self) -> Result<Role, RoleParseError> {
        self.role.parse()
    }
}

impl RefreshTokenRow {
    /// Convert to domain RefreshTokenId
    pub fn refresh_token_id(&self) -> RefreshTokenId {
        RefreshTokenId(self.id)
    }

    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }

    /// Whether the row outlived its refresh token
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

// Hashes stay out of logs.
impl std::fmt::Debug for UserRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RefreshTokenRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRow")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
