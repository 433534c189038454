// Job Domain Model

use crate::domain::artifact::{AudioArtifact, FinalArtifact, FootageArtifact};
use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Job ID (UUID v4)
pub type JobId = String;

/// Job status, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    GeneratingScript,
    GeneratingVoice,
    FetchingFootage,
    AssemblingVideo,
    Completed,
    Failed,
}

impl JobStatus {
    /// The only status reachable from `self` on success
    pub fn successor(self) -> Option<JobStatus> {
        match self {
            JobStatus::Queued => Some(JobStatus::GeneratingScript),
            JobStatus::GeneratingScript => Some(JobStatus::GeneratingVoice),
            JobStatus::GeneratingVoice => Some(JobStatus::FetchingFootage),
            JobStatus::FetchingFootage => Some(JobStatus::AssemblingVideo),
            JobStatus::AssemblingVideo => Some(JobStatus::Completed),
            JobStatus::Completed | JobStatus::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Position in the forward order (`Failed` sorts last)
    pub fn ordinal(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::GeneratingScript => 1,
            JobStatus::GeneratingVoice => 2,
            JobStatus::FetchingFootage => 3,
            JobStatus::AssemblingVideo => 4,
            JobStatus::Completed => 5,
            JobStatus::Failed => 6,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::GeneratingScript => "generating_script",
            JobStatus::GeneratingVoice => "generating_voice",
            JobStatus::FetchingFootage => "fetching_footage",
            JobStatus::AssemblingVideo => "assembling_video",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Coarse target length of the video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetDuration {
    #[default]
    Short,
    Medium,
    Long,
}

impl TargetDuration {
    pub fn parse(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(TargetDuration::Short),
            "medium" => Ok(TargetDuration::Medium),
            "long" => Ok(TargetDuration::Long),
            other => Err(DomainError::ValidationError(format!(
                "Unknown duration '{}' (expected short, medium or long)",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetDuration::Short => "short",
            TargetDuration::Medium => "medium",
            TargetDuration::Long => "long",
        }
    }
}

/// Immutable request parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParams {
    pub topic: String,
    pub template: String,
    pub voice: String,
    pub duration: TargetDuration,
}

/// Job Entity
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub status_message: String,
    pub params: JobParams,

    // Stage outputs
    pub script: Option<String>,
    pub audio: Option<AudioArtifact>,
    pub audio_duration_secs: Option<f64>, // local-mux only
    pub footage: Option<FootageArtifact>,
    pub final_artifact: Option<FinalArtifact>,

    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl Job {
    /// Create a new queued Job
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `params` - Request parameters
    pub fn new(id: impl Into<String>, created_at: i64, params: JobParams) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            status_message: "Job queued".to_string(),
            params,
            script: None,
            audio: None,
            audio_duration_secs: None,
            footage: None,
            final_artifact: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Move one step forward in the pipeline order
    pub fn advance(
        &mut self,
        to: JobStatus,
        message: impl Into<String>,
        now_millis: i64,
    ) -> Result<()> {
        if self.status.successor() != Some(to) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.status_message = message.into();
        self.updated_at = now_millis;
        Ok(())
    }

    /// Terminal failure from any non-terminal status
    pub fn fail(&mut self, message: impl Into<String>, now_millis: i64) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::AlreadyTerminal(self.id.clone()));
        }
        self.status = JobStatus::Failed;
        self.status_message = message.into();
        self.updated_at = now_millis;
        Ok(())
    }

    pub fn to_status_view(&self) -> JobStatusView {
        JobStatusView {
            job_id: self.id.clone(),
            status: self.status,
            status_message: self.status_message.clone(),
            topic: self.params.topic.clone(),
            template: self.params.template.clone(),
            voice: self.params.voice.clone(),
            duration: self.params.duration,
            script: self.script.clone(),
            has_audio: self.has_audio(),
            audio_duration_secs: self.audio_duration_secs,
            clip_count: self.footage.as_ref().map(|f| f.clip_count()),
            has_final: self.final_artifact.is_some(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Status view of a job (no binary payloads)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub status_message: String,
    pub topic: String,
    pub template: String,
    pub voice: String,
    pub duration: TargetDuration,
    pub script: Option<String>,
    pub has_audio: bool,
    pub audio_duration_secs: Option<f64>,
    pub clip_count: Option<usize>,
    pub has_final: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
