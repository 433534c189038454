//! RPC Method Handlers
//!
//! Thin translation between RPC types and the JobService.

use crate::error::to_rpc_error;
use crate::types::{
    AudioResponse, CreateVideoRequest, CreateVideoResponse, FinalResponse, JobIdRequest,
    ListRequest, ListResponse,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonrpsee::types::ErrorObjectOwned;
use reelforge_core::application::{CreateJobRequest, FinalOutput, JobService};
use reelforge_core::domain::JobStatusView;
use std::sync::Arc;
use tracing::debug;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<JobService>,
}

impl RpcHandler {
    pub fn new(service: Arc<JobService>) -> Self {
        Self { service }
    }

    /// video.create.v1
    pub async fn create(
        &self,
        params: CreateVideoRequest,
    ) -> Result<CreateVideoResponse, ErrorObjectOwned> {
        let mut req = CreateJobRequest::new(params.topic);
        if let Some(template) = params.template {
            req.template = template;
        }
        if let Some(voice) = params.voice {
            req.voice = voice;
        }
        if let Some(duration) = params.duration {
            req.duration = duration;
        }

        let created = self.service.create(req).await.map_err(to_rpc_error)?;

        Ok(CreateVideoResponse {
            job_id: created.job_id,
            status: created.status.to_string(),
        })
    }

    /// video.status.v1
    pub async fn status(&self, params: JobIdRequest) -> Result<JobStatusView, ErrorObjectOwned> {
        self.service
            .get_status(&params.job_id)
            .await
            .map_err(to_rpc_error)
    }

    /// video.audio.v1
    pub async fn audio(&self, params: JobIdRequest) -> Result<AudioResponse, ErrorObjectOwned> {
        let bytes = self
            .service
            .get_audio(&params.job_id)
            .await
            .map_err(to_rpc_error)?;

        debug!(job_id = %params.job_id, bytes = bytes.len(), "Serving audio");

        Ok(AudioResponse {
            job_id: params.job_id,
            content_type: "audio/mpeg".to_string(),
            size_bytes: bytes.len(),
            audio_base64: STANDARD.encode(&bytes),
        })
    }

    /// video.final.v1
    pub async fn final_video(
        &self,
        params: JobIdRequest,
    ) -> Result<FinalResponse, ErrorObjectOwned> {
        let output = self
            .service
            .get_final(&params.job_id)
            .await
            .map_err(to_rpc_error)?;

        let (url, path) = match output {
            FinalOutput::Redirect(url) => (Some(url), None),
            FinalOutput::File(path) => (None, Some(path.display().to_string())),
        };

        Ok(FinalResponse {
            job_id: params.job_id,
            url,
            path,
        })
    }

    /// video.list.v1
    pub async fn list(&self, params: ListRequest) -> Result<ListResponse, ErrorObjectOwned> {
        let mut jobs = self.service.list().await.map_err(to_rpc_error)?;
        let total = jobs.len();
        if let Some(limit) = params.limit {
            jobs.truncate(limit);
        }

        Ok(ListResponse { total, jobs })
    }
}
