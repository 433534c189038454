// Video Assembler Port

use crate::domain::{AudioArtifact, FinalArtifact, FootageArtifact, JobId};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where the final video gets composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyStrategy {
    /// Cloud render farm, observed via polling
    RemoteRender,
    /// Local ffmpeg mux
    LocalMux,
}

impl AssemblyStrategy {
    /// Local mux needs the exact voiceover length before footage is fetched
    pub fn requires_audio_probe(self) -> bool {
        matches!(self, AssemblyStrategy::LocalMux)
    }
}

impl std::str::FromStr for AssemblyStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "remote_render" => Ok(AssemblyStrategy::RemoteRender),
            "local" | "local_mux" => Ok(AssemblyStrategy::LocalMux),
            other => Err(format!("Unknown assembly strategy: {}", other)),
        }
    }
}

/// Everything the assembly stage consumes
#[derive(Debug, Clone)]
pub struct AssemblyInput {
    pub job_id: JobId,
    pub audio: AudioArtifact,
    pub audio_duration_secs: Option<f64>,
    pub footage: FootageArtifact,
}

#[async_trait]
pub trait VideoAssembler: Send + Sync {
    fn strategy(&self) -> AssemblyStrategy;

    /// # Errors
    /// - AppError::RenderFailed / AppError::RenderTimeout (remote)
    /// - AppError::Assembly (local encoder exited non-zero)
    async fn assemble(&self, input: &AssemblyInput) -> Result<FinalArtifact>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    pub struct MockVideoAssembler {
        strategy: AssemblyStrategy,
        response: std::result::Result<FinalArtifact, String>,
        inputs: Mutex<Vec<AssemblyInput>>,
    }

    impl MockVideoAssembler {
        pub fn new_success(strategy: AssemblyStrategy, artifact: FinalArtifact) -> Self {
            Self {
                strategy,
                response: Ok(artifact),
                inputs: Mutex::new(Vec::new()),
            }
        }

        pub fn new_fail(strategy: AssemblyStrategy, message: impl Into<String>) -> Self {
            Self {
                strategy,
                response: Err(message.into()),
                inputs: Mutex::new(Vec::new()),
            }
        }

        pub fn inputs(&self) -> Vec<AssemblyInput> {
            self.inputs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VideoAssembler for MockVideoAssembler {
        fn strategy(&self) -> AssemblyStrategy {
            self.strategy
        }

        async fn assemble(&self, input: &AssemblyInput) -> Result<FinalArtifact> {
            self.inputs.lock().unwrap().push(input.clone());
            self.response.clone().map_err(AppError::Assembly)
        }
    }
}
