// Pexels video-search FootageSource
use async_trait::async_trait;
use futures::StreamExt;
use rand::seq::SliceRandom;
use reelforge_core::catalog::footage_query;
use reelforge_core::domain::{ClipDescriptor, FootageArtifact};
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::{FootageRequest, FootageSource, SelectionPolicy};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::client::{ensure_success, parse_json, transport};

const PROVIDER: &str = "Pexels";
pub const DEFAULT_BASE_URL: &str = "https://api.pexels.com";

/// Candidates fetched when a single clip is picked for download
const DOWNLOAD_CANDIDATES: usize = 15;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    videos: Vec<PexelsVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PexelsVideo {
    id: u64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideoFile {
    link: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

impl PexelsVideo {
    /// Highest-resolution rendition (width x height)
    fn best_rendition(&self) -> Option<&VideoFile> {
        self.video_files.iter().max_by_key(|f| {
            u64::from(f.width.unwrap_or(0)) * u64::from(f.height.unwrap_or(0))
        })
    }

    fn descriptor(&self) -> Option<ClipDescriptor> {
        self.best_rendition().map(|file| ClipDescriptor {
            id: self.id.to_string(),
            url: file.link.clone(),
            duration_secs: self.duration,
        })
    }
}

/// What the adapter hands to the assembly stage
#[derive(Debug, Clone, PartialEq)]
pub enum FootageMode {
    /// Clip descriptors for a remote renderer
    Descriptors,
    /// One clip downloaded into `dir` for local muxing
    Download {
        dir: PathBuf,
        selection: SelectionPolicy,
    },
}

pub struct PexelsFootageSource {
    client: Client,
    api_key: SecretString,
    base_url: String,
    mode: FootageMode,
}

impl PexelsFootageSource {
    pub fn new(client: Client, api_key: SecretString, mode: FootageMode) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            mode,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn search(&self, query: &str, per_page: usize) -> Result<Vec<PexelsVideo>> {
        let url = format!("{}/videos/search", self.base_url);
        let per_page = per_page.max(1).to_string();

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.api_key.expose_secret())
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "portrait"),
            ])
            .send()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        let body = ensure_success(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        parse_search(&body)
    }

    /// Stream `url` into `path`; a failed transfer leaves no file behind
    async fn download(&self, url: &str, path: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(PROVIDER, e))?;
        let response = ensure_success(PROVIDER, response).await?;

        let mut file = tokio::fs::File::create(path).await?;
        let result = write_stream(&mut file, response).await;
        drop(file);

        if result.is_err() {
            discard_partial(path).await;
        }
        result
    }
}

async fn write_stream(file: &mut tokio::fs::File, response: reqwest::Response) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transport(PROVIDER, e))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed partial download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove partial download"),
    }
}

pub(crate) fn parse_search(body: &str) -> Result<Vec<PexelsVideo>> {
    let response: SearchResponse = parse_json(PROVIDER, body)?;
    Ok(response
        .videos
        .into_iter()
        .filter(|v| !v.video_files.is_empty())
        .collect())
}

/// Clips at least as long as the voiceover, or every clip when none qualify
pub(crate) fn candidates(videos: &[PexelsVideo], min_duration_secs: Option<f64>) -> Vec<&PexelsVideo> {
    if let Some(min) = min_duration_secs {
        let long_enough: Vec<&PexelsVideo> = videos.iter().filter(|v| v.duration >= min).collect();
        if !long_enough.is_empty() {
            return long_enough;
        }
    }
    videos.iter().collect()
}

pub(crate) fn select<'a>(
    candidates: &[&'a PexelsVideo],
    policy: SelectionPolicy,
) -> Option<&'a PexelsVideo> {
    match policy {
        SelectionPolicy::First => candidates.first().copied(),
        SelectionPolicy::Random => candidates.choose(&mut rand::thread_rng()).copied(),
    }
}

fn no_clips(template: &str) -> AppError {
    AppError::NotFound(format!("No video clips found for template '{}'", template))
}

#[async_trait]
impl FootageSource for PexelsFootageSource {
    async fn fetch(&self, request: &FootageRequest) -> Result<FootageArtifact> {
        let query = footage_query(&request.template);

        match &self.mode {
            FootageMode::Descriptors => {
                let videos = self.search(query, request.count).await?;
                let clips: Vec<ClipDescriptor> = videos
                    .iter()
                    .filter_map(PexelsVideo::descriptor)
                    .take(request.count)
                    .collect();
                if clips.is_empty() {
                    return Err(no_clips(&request.template));
                }

                debug!(job_id = %request.job_id, query = %query, clips = clips.len(), "Footage found");
                Ok(FootageArtifact::Clips(clips))
            }
            FootageMode::Download { dir, selection } => {
                let videos = self.search(query, DOWNLOAD_CANDIDATES).await?;
                let clip = {
                    let pool = candidates(&videos, request.min_duration_secs);
                    select(&pool, *selection).and_then(PexelsVideo::descriptor)
                }
                .ok_or_else(|| no_clips(&request.template))?;

                tokio::fs::create_dir_all(dir).await?;
                let path = dir.join(format!("{}_footage.mp4", request.job_id));
                let bytes = self.download(&clip.url, &path).await?;

                info!(
                    job_id = %request.job_id,
                    clip_id = %clip.id,
                    clip_secs = clip.duration_secs,
                    bytes = bytes,
                    "Footage downloaded"
                );
                Ok(FootageArtifact::Local { clip, path })
            }
        }
    }
}
