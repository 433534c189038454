// Pipeline artifacts produced by each stage

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Synthesized voiceover (MP3)
///
/// Either held in memory (remote-render deployments) or written to the shared
/// artifact directory (local-mux deployments, where ffmpeg needs a file).
#[derive(Clone)]
pub enum AudioArtifact {
    InMemory(Arc<Vec<u8>>),
    File(PathBuf),
}

impl AudioArtifact {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            AudioArtifact::File(path) => Some(path),
            AudioArtifact::InMemory(_) => None,
        }
    }
}

// Never dump the audio buffer into logs
impl fmt::Debug for AudioArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioArtifact::InMemory(bytes) => write!(f, "InMemory({} bytes)", bytes.len()),
            AudioArtifact::File(path) => write!(f, "File({})", path.display()),
        }
    }
}

/// Lightweight stock clip metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    pub id: String,
    pub url: String,
    pub duration_secs: f64,
}

/// Output of the footage stage
#[derive(Debug, Clone, PartialEq)]
pub enum FootageArtifact {
    /// Remote-render path: clips are referenced by URL, never downloaded
    Clips(Vec<ClipDescriptor>),
    /// Local-mux path: one clip downloaded in full
    Local { clip: ClipDescriptor, path: PathBuf },
}

impl FootageArtifact {
    pub fn clip_count(&self) -> usize {
        match self {
            FootageArtifact::Clips(clips) => clips.len(),
            FootageArtifact::Local { .. } => 1,
        }
    }
}

/// Assembled video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum FinalArtifact {
    /// Hosted by the render service
    Url(String),
    /// Written to the artifact directory
    File(PathBuf),
}
