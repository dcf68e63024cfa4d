//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Insert or update violated a unique constraint
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::UniqueViolation(db.constraint().unwrap_or("unknown").to_string())
            }
            other => Self::Sqlx(other),
        }
    }
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;
