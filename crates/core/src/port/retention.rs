// Artifact retention port
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one retention sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub scanned: usize,
    pub deleted: usize,
    pub bytes_freed: u64,
}

/// Retention configuration
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Files older than this are deleted, whatever their job's status
    pub max_age: Duration,

    /// How often the sweep runs
    pub interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(60 * 60),  // 1 hour
            interval: Duration::from_secs(30 * 60), // every 30 minutes
        }
    }
}

/// Deletes aged artifact files from the shared artifact directory
#[async_trait]
pub trait ArtifactRetention: Send + Sync {
    /// Delete files whose last modification is older than `max_age`
    ///
    /// # Returns
    /// Number of files scanned / deleted and bytes reclaimed
    async fn sweep(&self, max_age: Duration) -> Result<SweepStats>;
}
