//! Common test utilities for warden-auth-core integration tests

pub mod mock_repos;

use std::sync::Arc;

use warden_auth_core::{AuthConfig, AuthService, SessionManager};

#[allow(unused_imports)]
pub use mock_repos::{MockRefreshTokenRepository, MockUserRepository};

pub const ACCESS_SECRET: &str = "test-access-secret-0123456789abcdefghij";
pub const REFRESH_SECRET: &str = "test-refresh-secret-0123456789abcdefghij";

/// Config with the cheapest bcrypt cost so tests stay fast
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(ACCESS_SECRET, REFRESH_SECRET)
        .unwrap()
        .with_bcrypt_cost(4)
}

/// Session manager over fresh in-memory repositories
#[allow(dead_code)]
pub fn session_manager() -> (
    SessionManager<MockUserRepository, MockRefreshTokenRepository>,
    Arc<MockUserRepository>,
    Arc<MockRefreshTokenRepository>,
) {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockRefreshTokenRepository::new());
    let manager =
        SessionManager::from_config(&test_config(), users.clone(), tokens.clone()).unwrap();
    (manager, users, tokens)
}

/// Auth service over fresh in-memory repositories
#[allow(dead_code)]
pub fn auth_service() -> (
    AuthService<MockUserRepository, MockRefreshTokenRepository>,
    Arc<MockUserRepository>,
    Arc<MockRefreshTokenRepository>,
) {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockRefreshTokenRepository::new());
    let service = AuthService::new(test_config(), users.clone(), tokens.clone()).unwrap();
    (service, users, tokens)
}
