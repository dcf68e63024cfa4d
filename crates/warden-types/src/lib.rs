//! Warden Types - Shared domain types
//!
//! This crate contains domain types used across Warden crates:
//! - User identity and roles
//! - Refresh sessions and token pairs
//! - Authentication requests

pub mod auth;
pub mod session;
pub mod user;

pub use auth::*;
pub use session::*;
pub use user::*;
