//! Mock repositories for testing

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use warden_db::{
    CreateRefreshToken, CreateUser, DbError, DbResult, RefreshTokenRepository, RefreshTokenRow,
    UserRepository, UserRow,
};

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<i64, UserRow>>,
    by_email: Arc<DashMap<String, i64>>,
    next_id: Arc<AtomicI64>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        // The email index plays the part of the unique constraint
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation("users_email_key".to_string())),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                let row = UserRow {
                    id,
                    email: user.email,
                    password_hash: user.password_hash,
                    role: user.role,
                    created_at: Utc::now(),
                };
                slot.insert(id);
                self.users.insert(id, row.clone());
                Ok(row)
            }
        }
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        if let Some((_, user)) = self.users.remove(&id) {
            self.by_email.remove(&user.email);
        }
        Ok(())
    }
}

/// In-memory refresh token repository for testing
///
/// Deleting a user here does not cascade; tests that need it call
/// `delete_all_for_user` themselves.
#[derive(Default, Clone)]
pub struct MockRefreshTokenRepository {
    tokens: Arc<DashMap<i64, RefreshTokenRow>>,
    next_id: Arc<AtomicI64>,
    fail_creates: Arc<AtomicBool>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, bypassing the session manager
    #[allow(dead_code)]
    pub fn insert_row(&self, user_id: i64, token_hash: &str, expires_at: DateTime<Utc>) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.tokens.insert(
            id,
            RefreshTokenRow {
                id,
                user_id,
                token_hash: token_hash.to_string(),
                created_at: Utc::now(),
                expires_at,
            },
        );
        id
    }

    /// Make every following `create` fail with a database error
    #[allow(dead_code)]
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Total number of stored rows
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Number of rows belonging to a user
    #[allow(dead_code)]
    pub fn count_for_user(&self, user_id: i64) -> usize {
        self.tokens.iter().filter(|r| r.user_id == user_id).count()
    }

    /// Snapshot of a user's rows, oldest first
    #[allow(dead_code)]
    pub fn rows_for_user(&self, user_id: i64) -> Vec<RefreshTokenRow> {
        let mut rows: Vec<RefreshTokenRow> = self
            .tokens
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn find_by_user_id(&self, user_id: i64) -> DbResult<Vec<RefreshTokenRow>> {
        Ok(self.rows_for_user(user_id))
    }

    async fn create(&self, token: CreateRefreshToken) -> DbResult<RefreshTokenRow> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(DbError::NotFound);
        }
        let id = self.insert_row(token.user_id, &token.token_hash, token.expires_at);
        self.tokens
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }

    async fn rotate(
        &self,
        id: i64,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        // The shard lock held by get_mut makes the check-and-set atomic
        match self.tokens.get_mut(&id) {
            Some(mut row) if row.token_hash == current_hash => {
                row.token_hash = new_hash.to_string();
                row.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        Ok(self.tokens.remove(&id).is_some())
    }

    async fn delete_all_for_user(&self, user_id: i64) -> DbResult<u64> {
        let before = self.tokens.len();
        self.tokens.retain(|_, row| row.user_id != user_id);
        Ok((before - self.tokens.len()) as u64)
    }

    async fn delete_expired(&self) -> DbResult<u64> {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, row| row.expires_at >= now);
        Ok((before - self.tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_user_repo_unique_email() {
        let repo = MockUserRepository::new();
        let create = || CreateUser {
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: "REGULAR".to_string(),
        };

        let user = repo.create(create()).await.unwrap();
        assert!(repo.find_by_id(user.id).await.unwrap().is_some());
        assert!(matches!(
            repo.create(create()).await,
            Err(DbError::UniqueViolation(_))
        ));

        repo.delete(user.id).await.unwrap();
        assert!(repo.find_by_email("test@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_rotate_is_compare_and_swap() {
        let repo = MockRefreshTokenRepository::new();
        let expires = Utc::now() + chrono::Duration::days(7);
        let id = repo.insert_row(1, "old", expires);

        assert!(repo.rotate(id, "old", "new", expires).await.unwrap());
        assert!(!repo.rotate(id, "old", "newer", expires).await.unwrap());
        assert_eq!(repo.rows_for_user(1)[0].token_hash, "new");
    }
}
