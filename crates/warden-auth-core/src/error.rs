//! Auth errors

use thiserror::Error;
use warden_db::DbError;

/// Resource a `NotFound` error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// No user matches the email or id
    User,
    /// No stored refresh token matches the presented one
    RefreshToken,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::RefreshToken => write!(f, "refresh token"),
        }
    }
}

/// Authentication errors
///
/// `Conflict`, `NotFound` and `Unauthorized` are the business outcomes the
/// caller can fix by retrying with different input. `Database`,
/// `Configuration` and `Internal` are infrastructure failures; their
/// messages stay generic.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A user with this email already exists
    #[error("user already exists")]
    Conflict,

    /// Unknown user, unknown or stale refresh token
    #[error("{0} not found")]
    NotFound(Resource),

    /// Password does not match
    #[error("invalid credentials")]
    Unauthorized,

    /// Invalid token (malformed, bad signature, wrong secret)
    #[error("invalid token")]
    InvalidToken,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Database error
    #[error("database error")]
    Database(#[source] DbError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error (hashing, signing, task failures)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized | Self::InvalidToken | Self::TokenExpired => 401,
            Self::NotFound(_) => 404,
            Self::Conflict => 409,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict => "USER_EXISTS",
            Self::NotFound(Resource::User) => "USER_NOT_FOUND",
            Self::NotFound(Resource::RefreshToken) => "REFRESH_TOKEN_NOT_FOUND",
            Self::Unauthorized => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(constraint) => {
                tracing::debug!(constraint = %constraint, "Unique constraint violated");
                Self::Conflict
            }
            other => {
                tracing::error!("Database error: {}", other);
                Self::Database(other)
            }
        }
    }
}
