//! Warden Session Reaper
//!
//! Periodically deletes refresh tokens that are past their expiry.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use warden_auth_core::RefreshTokenReaper;
use warden_db::{create_pool_with_options, PoolOptions, Repositories};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        "Starting Warden session reaper"
    );

    let pool = create_pool_with_options(
        &config.database_url,
        PoolOptions {
            max_connections: config.max_connections,
            ..PoolOptions::default()
        },
    )
    .await?;

    let repos = Repositories::new(pool);
    let repo = Arc::new(repos.refresh_tokens);
    let handle = RefreshTokenReaper::new(repo, config.interval).spawn();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    handle.shutdown().await;

    Ok(())
}
