// Filesystem artifact retention
use async_trait::async_trait;
use reelforge_core::error::Result;
use reelforge_core::port::{ArtifactRetention, SweepStats, TimeProvider};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Deletes aged files from the shared artifact directory
///
/// Age is judged by file mtime against the injected clock. Job records are
/// left alone; queries for swept artifacts report them as gone.
pub struct FsArtifactRetention {
    dir: PathBuf,
    time_provider: Arc<dyn TimeProvider>,
}

impl FsArtifactRetention {
    pub fn new(dir: impl Into<PathBuf>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            dir: dir.into(),
            time_provider,
        }
    }
}

#[async_trait]
impl ArtifactRetention for FsArtifactRetention {
    async fn sweep(&self, max_age: Duration) -> Result<SweepStats> {
        let now = self.time_provider.now_millis();
        let cutoff = now - max_age.as_millis() as i64;
        let mut stats = SweepStats::default();

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %self.dir.display(), "Artifact directory missing, nothing to sweep");
                return Ok(stats);
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            stats.scanned += 1;

            let modified_ms = match metadata.modified() {
                Ok(t) => t
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as i64)
                    .unwrap_or(0),
                Err(_) => continue,
            };
            if modified_ms >= cutoff {
                continue;
            }

            let path = entry.path();
            match tokio::fs::remove_file(&path).await {
                Ok(_) => {
                    stats.deleted += 1;
                    stats.bytes_freed += metadata.len();
                    debug!(path = %path.display(), "Deleted expired artifact");
                }
                Err(e) => {
                    // Another sweep or a concurrent request may have removed it
                    warn!(path = %path.display(), error = %e, "Failed to delete artifact");
                }
            }
        }

        info!(
            scanned = stats.scanned,
            deleted = stats.deleted,
            bytes_freed = stats.bytes_freed,
            "Artifact sweep completed"
        );

        Ok(stats)
    }
}
