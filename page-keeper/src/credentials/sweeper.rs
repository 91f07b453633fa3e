//! Expiry sweep.
//!
//! Recomputes the stored `active` flag of every resource from its stored expiry.
//! No external calls are made.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::context::SyncContext;
use super::error::SyncError;
use super::expiry::is_expired;

#[derive(Clone)]
pub struct Sweeper {
    ctx: SyncContext,
}

impl Sweeper {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Write back every resource whose flag changed. Returns how many were updated.
    ///
    /// Each write is conditional on the stored expiry still being the one that
    /// was evaluated, so a concurrent renewal always wins.
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> Result<u64, SyncError> {
        let now = self.ctx.clock.now();
        let resources = self.ctx.store.list_resources().await?;

        let mut updated = 0u64;
        for resource in &resources {
            let active = !is_expired(resource.credential_expiry, now);
            if active == resource.active {
                continue;
            }
            if self
                .ctx
                .store
                .update_resource_active(&resource.resource_id, resource.credential_expiry, active, now)
                .await?
            {
                debug!(resource_id = %resource.resource_id, active, "Resource flag updated");
                updated += 1;
            }
        }

        let pruned = self.ctx.locks.prune_idle();
        info!(
            scanned = resources.len(),
            updated,
            pruned_locks = pruned,
            "Sweep complete"
        );
        Ok(updated)
    }
}

/// Runs [`Sweeper::sweep`] on a fixed interval until cancelled.
pub struct SweepScheduler {
    sweeper: Sweeper,
    interval: Duration,
}

impl SweepScheduler {
    /// `interval` is clamped to at least one second.
    pub fn new(sweeper: Sweeper, interval: Duration) -> Self {
        Self {
            sweeper,
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// Spawn the sweep loop. Sweep failures are logged and the loop carries on.
    pub fn start(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "Sweep scheduler started");
            self.run_loop(cancel).await;
            info!("Sweep scheduler stopped");
        })
    }

    async fn run_loop(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.sweeper.sweep().await {
                        error!(error = %e, "Scheduled sweep failed");
                    }
                }
            }
        }
    }
}
