// Retention Scheduler
// Periodically deletes aged artifact files; job records are never touched

use crate::application::shutdown::ShutdownToken;
use crate::error::Result;
use crate::port::{ArtifactRetention, RetentionConfig, SweepStats};
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Retention scheduler
///
/// Runs an artifact sweep every `config.interval` in the background
pub struct RetentionScheduler {
    retention: Arc<dyn ArtifactRetention>,
    config: RetentionConfig,
}

impl RetentionScheduler {
    pub fn new(retention: Arc<dyn ArtifactRetention>, config: RetentionConfig) -> Self {
        Self { retention, config }
    }

    /// Run sweep loop until shutdown (background task)
    ///
    /// Should be spawned in tokio::spawn
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.config.max_age.as_secs(),
            "Retention scheduler started"
        );

        let mut tick = interval(self.config.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately; skip it so the first sweep happens one interval in
        tick.tick().await;

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.run_now().await {
                        error!(error = %e, "Scheduled retention sweep failed");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Retention scheduler stopped");
    }

    /// Run a sweep immediately
    pub async fn run_now(&self) -> Result<SweepStats> {
        let stats = self.retention.sweep(self.config.max_age).await?;

        info!(
            scanned = stats.scanned,
            deleted = stats.deleted,
            bytes_freed = stats.bytes_freed,
            "Retention sweep completed"
        );

        Ok(stats)
    }
}
