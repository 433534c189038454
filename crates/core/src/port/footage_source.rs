// Footage Source Port

use crate::domain::{FootageArtifact, JobId};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the footage stage asks for
#[derive(Debug, Clone, PartialEq)]
pub struct FootageRequest {
    pub job_id: JobId,
    /// Template/category, mapped to a search query by the adapter
    pub template: String,
    /// Upper bound on clips returned as descriptors
    pub count: usize,
    /// Probed voiceover length (local-mux only)
    pub min_duration_secs: Option<f64>,
}

/// How one clip is chosen out of a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    First,
    #[default]
    Random,
}

impl std::str::FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(SelectionPolicy::First),
            "random" => Ok(SelectionPolicy::Random),
            other => Err(format!("Unknown footage selection policy: {}", other)),
        }
    }
}

/// Sources stock video for a job
#[async_trait]
pub trait FootageSource: Send + Sync {
    /// # Errors
    /// - AppError::NotFound when the search yields zero clips
    /// - AppError::Provider on non-success responses
    async fn fetch(&self, request: &FootageRequest) -> Result<FootageArtifact>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    pub enum MockFootage {
        Found(FootageArtifact),
        Empty,
        Fail(String),
    }

    pub struct MockFootageSource {
        behavior: MockFootage,
        requests: Mutex<Vec<FootageRequest>>,
    }

    impl MockFootageSource {
        pub fn new(behavior: MockFootage) -> Self {
            Self {
                behavior,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<FootageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FootageSource for MockFootageSource {
        async fn fetch(&self, request: &FootageRequest) -> Result<FootageArtifact> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.behavior {
                MockFootage::Found(artifact) => Ok(artifact.clone()),
                MockFootage::Empty => Err(AppError::NotFound(format!(
                    "No video clips found for template '{}'",
                    request.template
                ))),
                MockFootage::Fail(msg) => Err(AppError::provider("Pexels", msg.clone())),
            }
        }
    }
}
