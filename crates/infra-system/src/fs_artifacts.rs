// Filesystem ArtifactStore (local-mux deployments)
use async_trait::async_trait;
use reelforge_core::domain::{AudioArtifact, FinalArtifact};
use reelforge_core::error::Result;
use reelforge_core::port::ArtifactStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes audio into the shared artifact directory so ffmpeg can read it
///
/// Files here are subject to the retention sweep; a swept file reads as absent.
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn audio_path(&self, job_id: &str) -> PathBuf {
        self.dir.join(format!("{}_audio.mp3", job_id))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn store_audio(&self, job_id: &str, audio: Vec<u8>) -> Result<AudioArtifact> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.audio_path(job_id);
        tokio::fs::write(&path, &audio).await?;

        debug!(job_id = %job_id, path = %path.display(), bytes = audio.len(), "Audio written");
        Ok(AudioArtifact::File(path))
    }

    async fn load_audio(&self, artifact: &AudioArtifact) -> Result<Option<Vec<u8>>> {
        match artifact {
            AudioArtifact::InMemory(bytes) => Ok(Some(bytes.as_ref().clone())),
            AudioArtifact::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    async fn final_available(&self, artifact: &FinalArtifact) -> bool {
        match artifact {
            FinalArtifact::Url(_) => true,
            FinalArtifact::File(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
        }
    }
}
