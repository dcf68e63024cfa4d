//! Warden Auth Core - Credential and session lifecycle
//!
//! Signup and signin with bcrypt-hashed passwords, short-lived access tokens,
//! and single-use refresh tokens that rotate on every refresh and are revoked
//! by deletion on logout.

pub mod config;
pub mod crypto;
pub mod error;
pub mod reaper;
pub mod service;
pub mod session;
pub mod token;

pub use config::*;
pub use crypto::{token_digest, PasswordHasher};
pub use error::*;
pub use reaper::{ReaperHandle, RefreshTokenReaper};
pub use service::*;
pub use session::*;
pub use token::{RefreshGrant, TokenClaims, TokenIssuer, TokenKind};
