//! Configuration for the session reaper.

use std::time::Duration;

/// Session reaper configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL
    pub database_url: String,

    /// Maximum pool connections
    pub max_connections: u32,

    /// Time between cleanup passes
    pub interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?;

        let interval_secs: u64 = lookup("REAPER_INTERVAL_SECS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REAPER_INTERVAL_SECS"))?;

        if interval_secs == 0 {
            return Err(ConfigError::Invalid("REAPER_INTERVAL_SECS"));
        }

        Ok(Self {
            database_url,
            max_connections,
            interval: Duration::from_secs(interval_secs),
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
