//! Background removal of expired refresh token rows
//!
//! Rows are otherwise only removed by logout, so sessions that are simply
//! abandoned would stay in the store forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use warden_db::RefreshTokenRepository;

use crate::AuthError;

/// Periodically deletes refresh token rows past their expiry
pub struct RefreshTokenReaper<R: RefreshTokenRepository> {
    repo: Arc<R>,
    interval: Duration,
}

impl<R: RefreshTokenRepository + 'static> RefreshTokenReaper<R> {
    /// Create a reaper running every `interval` (at least one millisecond)
    pub fn new(repo: Arc<R>, interval: Duration) -> Self {
        Self {
            repo,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Delete expired rows once and return how many were removed
    pub async fn reap_once(&self) -> Result<u64, AuthError> {
        let removed = self.repo.delete_expired().await?;
        if removed > 0 {
            tracing::info!(removed, "Reaped expired refresh tokens");
        } else {
            tracing::debug!("No expired refresh tokens");
        }
        Ok(removed)
    }

    /// Run in the background until the handle is shut down
    ///
    /// The first pass runs immediately. Dropping the handle also stops it.
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        ReaperHandle {
            shutdown: shutdown_tx,
            task: tokio::spawn(self.run(shutdown_rx)),
        }
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.reap_once().await {
                        tracing::warn!(error = %e, "Refresh token reaping failed (will retry)");
                    }
                }
            }
        }

        tracing::debug!("Refresh token reaper stopped");
    }
}

/// Handle for the background reaper task
pub struct ReaperHandle {
    shutdown: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl ReaperHandle {
    /// Stop the reaper and wait for it to finish its current pass
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

impl<R: RefreshTokenRepository> std::fmt::Debug for RefreshTokenReaper<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenReaper")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
