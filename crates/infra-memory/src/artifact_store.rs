// In-memory ArtifactStore (remote-render deployments)
use async_trait::async_trait;
use reelforge_core::domain::{AudioArtifact, FinalArtifact};
use reelforge_core::error::Result;
use reelforge_core::port::ArtifactStore;
use std::sync::Arc;

/// Keeps audio as an in-memory buffer on the job record
///
/// Final videos are always hosted URLs in this mode, so they are always available.
#[derive(Default)]
pub struct MemoryArtifactStore;

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store_audio(&self, _job_id: &str, audio: Vec<u8>) -> Result<AudioArtifact> {
        Ok(AudioArtifact::InMemory(Arc::new(audio)))
    }

    async fn load_audio(&self, artifact: &AudioArtifact) -> Result<Option<Vec<u8>>> {
        match artifact {
            AudioArtifact::InMemory(bytes) => Ok(Some(bytes.as_ref().clone())),
            // Never produced by this store
            AudioArtifact::File(_) => Ok(None),
        }
    }

    async fn final_available(&self, artifact: &FinalArtifact) -> bool {
        matches!(artifact, FinalArtifact::Url(_))
    }
}
