//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};

/// video.create.v1 - Start a new video job
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub topic: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateVideoResponse {
    pub job_id: String,
    pub status: String,
}

/// Parameters for every single-job query (status, audio, final)
#[derive(Debug, Deserialize)]
pub struct JobIdRequest {
    pub job_id: String,
}

/// video.audio.v1 - Voiceover bytes, base64 encoded
#[derive(Debug, Clone, Serialize)]
pub struct AudioResponse {
    pub job_id: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub audio_base64: String,
}

/// video.final.v1 - Where the finished video can be fetched
#[derive(Debug, Clone, Serialize)]
pub struct FinalResponse {
    pub job_id: String,
    /// Hosted render URL (remote strategy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Local file (local strategy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// video.list.v1 - Recent jobs
#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub jobs: Vec<reelforge_core::domain::JobStatusView>,
}
