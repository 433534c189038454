// Job Store Port (Interface)

use crate::domain::{Job, JobId};
use crate::error::Result;
use async_trait::async_trait;

/// Process-wide job registry
///
/// Implementations must be safe under concurrent inserts, lookups and updates
/// from many running pipelines and query calls.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Register a new job (Conflict if the id already exists)
    async fn insert(&self, job: &Job) -> Result<()>;

    /// Find job by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Job>>;

    /// Replace the stored record (NotFound if it was never inserted)
    async fn update(&self, job: &Job) -> Result<()>;

    /// All jobs, newest first
    async fn list(&self) -> Result<Vec<Job>>;

    /// Number of registered jobs
    async fn len(&self) -> Result<usize>;

    async fn contains(&self, id: &JobId) -> Result<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::JobStatus;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// HashMap-backed store that also records every status it was given
    #[derive(Default)]
    pub struct MockJobStore {
        jobs: Mutex<HashMap<JobId, Job>>,
        history: Mutex<HashMap<JobId, Vec<JobStatus>>>,
        rejected_status: Mutex<Option<JobStatus>>,
    }

    impl MockJobStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail every update that writes `status`
        pub fn reject_updates_to(self, status: JobStatus) -> Self {
            *self.rejected_status.lock().unwrap() = Some(status);
            self
        }

        /// Statuses written for a job, in write order
        pub fn status_history(&self, id: &str) -> Vec<JobStatus> {
            self.history
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl JobStore for MockJobStore {
        async fn insert(&self, job: &Job) -> Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            if jobs.contains_key(&job.id) {
                return Err(AppError::Conflict(format!("Job {} already exists", job.id)));
            }
            jobs.insert(job.id.clone(), job.clone());
            self.history
                .lock()
                .unwrap()
                .insert(job.id.clone(), vec![job.status]);
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
            Ok(self.jobs.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, job: &Job) -> Result<()> {
            if *self.rejected_status.lock().unwrap() == Some(job.status) {
                return Err(AppError::Internal(format!(
                    "store rejected status {}",
                    job.status
                )));
            }
            let mut jobs = self.jobs.lock().unwrap();
            match jobs.get_mut(&job.id) {
                Some(slot) => *slot = job.clone(),
                None => return Err(AppError::NotFound(format!("Job {} not found", job.id))),
            }
            let mut history = self.history.lock().unwrap();
            let entry = history.entry(job.id.clone()).or_default();
            if entry.last() != Some(&job.status) {
                entry.push(job.status);
            }
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Job>> {
            let mut jobs: Vec<Job> = self.jobs.lock().unwrap().values().cloned().collect();
            jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(jobs)
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.jobs.lock().unwrap().len())
        }
    }
}
