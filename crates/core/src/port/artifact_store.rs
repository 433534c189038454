// Artifact Store Port

use crate::domain::{AudioArtifact, FinalArtifact};
use crate::error::Result;
use async_trait::async_trait;

/// Holds stage outputs that outlive a single adapter call
///
/// File-backed artifacts may disappear underneath the job record (retention
/// sweep), so reads report absence instead of failing.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Keep synthesized audio for a job
    async fn store_audio(&self, job_id: &str, audio: Vec<u8>) -> Result<AudioArtifact>;

    /// Audio bytes, or None if the backing file is gone
    async fn load_audio(&self, artifact: &AudioArtifact) -> Result<Option<Vec<u8>>>;

    /// Whether the final video can still be served
    async fn final_available(&self, artifact: &FinalArtifact) -> bool;
}

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Keeps audio in memory; `sweep()` makes every artifact unavailable
    #[derive(Default)]
    pub struct MockArtifactStore {
        swept: AtomicBool,
    }

    impl MockArtifactStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sweep(&self) {
            self.swept.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ArtifactStore for MockArtifactStore {
        async fn store_audio(&self, _job_id: &str, audio: Vec<u8>) -> Result<AudioArtifact> {
            Ok(AudioArtifact::InMemory(Arc::new(audio)))
        }

        async fn load_audio(&self, artifact: &AudioArtifact) -> Result<Option<Vec<u8>>> {
            if self.swept.load(Ordering::SeqCst) {
                return Ok(None);
            }
            match artifact {
                AudioArtifact::InMemory(bytes) => Ok(Some(bytes.as_ref().clone())),
                AudioArtifact::File(_) => Ok(None),
            }
        }

        async fn final_available(&self, _artifact: &FinalArtifact) -> bool {
            !self.swept.load(Ordering::SeqCst)
        }
    }
}
