// Job Service - creation and query surface

pub mod create;

pub use create::{CreateJobRequest, CreatedJob};

use crate::application::pipeline::Orchestrator;
use crate::domain::{FinalArtifact, Job, JobStatus, JobStatusView};
use crate::error::{AppError, Result};
use crate::port::{ArtifactStore, IdProvider, JobStore, TimeProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// How the final video should be served
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalOutput {
    /// Hosted elsewhere; redirect the client
    Redirect(String),
    /// Local file to stream
    File(PathBuf),
}

pub struct JobService {
    job_store: Arc<dyn JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
    orchestrator: Arc<Orchestrator>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobService {
    pub fn new(
        job_store: Arc<dyn JobStore>,
        artifacts: Arc<dyn ArtifactStore>,
        orchestrator: Arc<Orchestrator>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_store,
            artifacts,
            orchestrator,
            id_provider,
            time_provider,
        }
    }

    /// Register a job and start its pipeline in the background
    ///
    /// Returns as soon as the job is stored; the pipeline runs on its own task.
    pub async fn create(&self, req: CreateJobRequest) -> Result<CreatedJob> {
        let job = create::execute(
            self.job_store.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await?;

        info!(job_id = %job.id, topic = %job.params.topic, template = %job.params.template, "Job created");

        let orchestrator = Arc::clone(&self.orchestrator);
        let job_id = job.id.clone();
        tokio::spawn(async move {
            orchestrator.run_pipeline(&job_id).await;
        });

        Ok(CreatedJob {
            job_id: job.id,
            status: job.status,
        })
    }

    pub async fn get(&self, job_id: &str) -> Result<Job> {
        self.job_store
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
    }

    pub async fn get_status(&self, job_id: &str) -> Result<JobStatusView> {
        Ok(self.get(job_id).await?.to_status_view())
    }

    /// Synthesized voiceover bytes
    ///
    /// NotFound before the voice stage completes, or once the backing file was swept.
    pub async fn get_audio(&self, job_id: &str) -> Result<Vec<u8>> {
        let job = self.get(job_id).await?;
        let artifact = job
            .audio
            .ok_or_else(|| AppError::NotFound(format!("Audio not ready for job {}", job_id)))?;

        self.artifacts
            .load_audio(&artifact)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Audio no longer available for job {}", job_id)))
    }

    /// Final video location
    ///
    /// NotFound until assembly completed, or once the backing file was swept.
    pub async fn get_final(&self, job_id: &str) -> Result<FinalOutput> {
        let job = self.get(job_id).await?;
        let artifact = match (job.status, job.final_artifact) {
            (JobStatus::Completed, Some(artifact)) => artifact,
            _ => {
                return Err(AppError::NotFound(format!(
                    "Video not ready for job {}",
                    job_id
                )))
            }
        };

        if !self.artifacts.final_available(&artifact).await {
            return Err(AppError::NotFound(format!(
                "Video no longer available for job {}",
                job_id
            )));
        }

        Ok(match artifact {
            FinalArtifact::Url(url) => FinalOutput::Redirect(url),
            FinalArtifact::File(path) => FinalOutput::File(path),
        })
    }

    /// Status views of every job, newest first
    pub async fn list(&self) -> Result<Vec<JobStatusView>> {
        Ok(self
            .job_store
            .list()
            .await?
            .iter()
            .map(Job::to_status_view)
            .collect())
    }
}
