// Create Use Case

use crate::application::pipeline::constants::MAX_TOPIC_CHARS;
use crate::domain::{Job, JobParams, JobStatus, TargetDuration};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, JobStore, TimeProvider};
use serde::{Deserialize, Serialize};

/// Create request, as received from the API layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub topic: String,

    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_duration")]
    pub duration: String,
}

impl CreateJobRequest {
    /// Request with default template, voice and duration
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            template: default_template(),
            voice: default_voice(),
            duration: default_duration(),
        }
    }
}

fn default_template() -> String {
    "motivational".to_string()
}

fn default_voice() -> String {
    "female_1".to_string()
}

fn default_duration() -> String {
    "short".to_string()
}

/// Returned immediately, before any stage runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedJob {
    pub job_id: String,
    pub status: JobStatus,
}

/// Validate request fields and resolve the duration bucket
pub fn validate_request(req: &CreateJobRequest) -> Result<JobParams> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("Topic cannot be empty".to_string()));
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(AppError::Validation(format!(
            "Topic too long (max {} characters)",
            MAX_TOPIC_CHARS
        )));
    }

    let duration = TargetDuration::parse(&req.duration)?;

    Ok(JobParams {
        topic: topic.to_string(),
        template: req.template.trim().to_string(),
        voice: req.voice.trim().to_string(),
        duration,
    })
}

/// Register a new queued job
///
/// # Arguments
///
/// * `job_store` - Job store
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `req` - Create request
pub async fn execute(
    job_store: &dyn JobStore,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: CreateJobRequest,
) -> Result<Job> {
    let params = validate_request(&req)?;

    let job = Job::new(id_provider.generate_id(), time_provider.now_millis(), params);
    job_store.insert(&job).await?;

    Ok(job)
}
