// In-memory JobStore implementation
use async_trait::async_trait;
use reelforge_core::domain::{Job, JobId};
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::JobStore;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-wide job map
///
/// Readers (status polls) share the lock; each pipeline only ever writes its own
/// record, so write sections stay short.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(AppError::Conflict(format!("Job {} already exists", job.id)));
        }
        jobs.insert(job.id.clone(), job.clone());
        debug!(job_id = %job.id, total = jobs.len(), "Job inserted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn update(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Job {} not found", job.id))),
        }
    }

    async fn list(&self) -> Result<Vec<Job>> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(jobs)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.jobs.read().await.len())
    }
}
