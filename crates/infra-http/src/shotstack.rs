// Shotstack RenderService (remote-render strategy)
use async_trait::async_trait;
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::{RenderService, RenderSpec, RenderState};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::debug;

use crate::client::{ensure_success, parse_json, transport};

const PROVIDER: &str = "Shotstack";
const API_KEY_HEADER: &str = "x-api-key";

/// Shotstack environment; `stage` renders are watermarked and free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotstackEnv {
    #[default]
    Stage,
    V1,
}

impl ShotstackEnv {
    pub fn base_url(self) -> &'static str {
        match self {
            ShotstackEnv::Stage => "https://api.shotstack.io/edit/stage",
            ShotstackEnv::V1 => "https://api.shotstack.io/edit/v1",
        }
    }
}

impl FromStr for ShotstackEnv {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stage" => Ok(ShotstackEnv::Stage),
            "v1" | "production" => Ok(ShotstackEnv::V1),
            other => Err(format!("Unknown Shotstack environment: {}", other)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: Option<String>,
    response: Option<T>,
}

#[derive(Debug, Deserialize)]
struct QueuedRender {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RenderStatus {
    status: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ShotstackRenderService {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl ShotstackRenderService {
    pub fn new(client: Client, api_key: SecretString, env: ShotstackEnv) -> Self {
        Self {
            client,
            api_key,
            base_url: env.base_url().to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Shotstack edit payload: one video track plus optional soundtrack
pub fn render_payload(spec: &RenderSpec) -> Value {
    let clips: Vec<Value> = spec
        .clips
        .iter()
        .map(|clip| {
            json!({
                "asset": { "type": "video", "src": clip.src },
                "start": clip.start,
                "length": clip.length,
                "fit": spec.fit,
            })
        })
        .collect();

    let mut timeline = json!({ "tracks": [ { "clips": clips } ] });
    if let Some(url) = &spec.soundtrack_url {
        timeline["soundtrack"] = json!({ "src": url, "effect": "fadeOut" });
    }

    json!({
        "timeline": timeline,
        "output": {
            "format": spec.output.format,
            "size": { "width": spec.output.width, "height": spec.output.height },
        },
    })
}

fn parse_queued(body: &str) -> Result<String> {
    let envelope: Envelope<QueuedRender> = parse_json(PROVIDER, body)?;
    match envelope.response {
        Some(queued) => Ok(queued.id),
        None => Err(AppError::provider(
            PROVIDER,
            envelope
                .message
                .unwrap_or_else(|| "render submission returned no id".to_string()),
        )),
    }
}

pub(crate) fn parse_status(body: &str) -> Result<RenderState> {
    let envelope: Envelope<RenderStatus> = parse_json(PROVIDER, body)?;
    let status = envelope
        .response
        .ok_or_else(|| AppError::provider(PROVIDER, "status response had no body"))?;

    match status.status.as_str() {
        "done" => status
            .url
            .map(|url| RenderState::Done { url })
            .ok_or_else(|| AppError::provider(PROVIDER, "render done without a url")),
        "failed" => Ok(RenderState::Failed {
            message: status
                .error
                .unwrap_or_else(|| "render failed".to_string()),
        }),
        // queued, fetching, rendering, saving
        other => Ok(RenderState::InProgress(other.to_string())),
    }
}

#[async_trait]
impl RenderService for ShotstackRenderService {
    async fn submit(&self, spec: &RenderSpec) -> Result<String> {
        let url = format!("{}/render", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&render_payload(spec))
            .send()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        let body = ensure_success(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        let render_id = parse_queued(&body)?;
        debug!(render_id = %render_id, clips = spec.clips.len(), "Render submitted");
        Ok(render_id)
    }

    async fn status(&self, render_id: &str) -> Result<RenderState> {
        let url = format!("{}/render/{}", self.base_url, render_id);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        let body = ensure_success(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        parse_status(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canned::{closed_port, serve_one, Canned, CannedServer};
    use reelforge_core::port::{OutputSpec, TimelineClip};

    fn service(base_url: &str) -> ShotstackRenderService {
        ShotstackRenderService::new(
            Client::new(),
            SecretString::from("ss-test".to_string()),
            ShotstackEnv::Stage,
        )
        .with_base_url(base_url)
    }

    fn spec(soundtrack: Option<&str>) -> RenderSpec {
        RenderSpec {
            clips: vec![
                TimelineClip {
                    src: "https://cdn.example/1.mp4".to_string(),
                    start: 0.0,
                    length: 5.0,
                },
                TimelineClip {
                    src: "https://cdn.example/2.mp4".to_string(),
                    start: 5.0,
                    length: 3.5,
                },
            ],
            fit: "cover".to_string(),
            soundtrack_url: soundtrack.map(str::to_string),
            output: OutputSpec::default(),
        }
    }

    #[test]
    fn test_payload_places_clips_on_one_track() {
        let payload = render_payload(&spec(None));
        let clips = &payload["timeline"]["tracks"][0]["clips"];

        assert_eq!(clips.as_array().unwrap().len(), 2);
        assert_eq!(clips[1]["asset"]["src"], "https://cdn.example/2.mp4");
        assert_eq!(clips[1]["start"], 5.0);
        assert_eq!(clips[1]["length"], 3.5);
        assert_eq!(clips[0]["fit"], "cover");
        assert_eq!(payload["output"]["format"], "mp4");
        assert_eq!(payload["output"]["size"]["width"], 1080);
        assert_eq!(payload["output"]["size"]["height"], 1920);
        assert!(payload["timeline"].get("soundtrack").is_none());
    }

    #[test]
    fn test_payload_soundtrack() {
        let payload = render_payload(&spec(Some("https://reels.example/jobs/job-1/audio")));
        assert_eq!(
            payload["timeline"]["soundtrack"]["src"],
            "https://reels.example/jobs/job-1/audio"
        );
    }

    #[test]
    fn test_parse_queued() {
        let body = r#"{"success":true,"message":"Created","response":{"message":"Render Successfully Queued","id":"d2b46ed6-998a-4d6b-9d91-b8cf0193a655"}}"#;
        assert_eq!(
            parse_queued(body).unwrap(),
            "d2b46ed6-998a-4d6b-9d91-b8cf0193a655"
        );

        let rejected = r#"{"success":false,"message":"Bad Request"}"#;
        assert!(parse_queued(rejected)
            .unwrap_err()
            .to_string()
            .contains("Bad Request"));
    }

    #[test]
    fn test_parse_status_variants() {
        let rendering = r#"{"success":true,"response":{"id":"r1","status":"rendering"}}"#;
        assert_eq!(
            parse_status(rendering).unwrap(),
            RenderState::InProgress("rendering".to_string())
        );

        let done = r#"{"success":true,"response":{"id":"r1","status":"done","url":"https://cdn.shotstack.io/r1.mp4"}}"#;
        assert_eq!(
            parse_status(done).unwrap(),
            RenderState::Done {
                url: "https://cdn.shotstack.io/r1.mp4".to_string()
            }
        );

        let failed = r#"{"success":true,"response":{"id":"r1","status":"failed","error":"asset 404"}}"#;
        assert_eq!(
            parse_status(failed).unwrap(),
            RenderState::Failed {
                message: "asset 404".to_string()
            }
        );
    }

    #[test]
    fn test_done_without_url_is_provider_error() {
        let body = r#"{"success":true,"response":{"id":"r1","status":"done"}}"#;
        assert!(matches!(
            parse_status(body),
            Err(AppError::Provider { .. })
        ));
    }

    #[test]
    fn test_env_parsing() {
        assert_eq!("stage".parse::<ShotstackEnv>().unwrap(), ShotstackEnv::Stage);
        assert_eq!("V1".parse::<ShotstackEnv>().unwrap(), ShotstackEnv::V1);
        assert!("prod-eu".parse::<ShotstackEnv>().is_err());
    }

    #[test]
    fn test_malformed_status_is_provider_error() {
        assert!(matches!(
            parse_status("upstream timeout"),
            Err(AppError::Provider { .. })
        ));
        assert!(matches!(
            parse_queued(""),
            Err(AppError::Provider { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_and_poll_status() {
        let server = CannedServer::bind().await;
        let base = server.serve(vec![
            (
                "/render/r-42",
                Canned::json(200, r#"{"success":true,"response":{"id":"r-42","status":"saving"}}"#),
            ),
            (
                "/render",
                Canned::json(201, r#"{"success":true,"response":{"id":"r-42"}}"#),
            ),
        ]);
        let service = service(&base);

        let render_id = service.submit(&spec(None)).await.unwrap();
        assert_eq!(render_id, "r-42");
        assert_eq!(
            service.status(&render_id).await.unwrap(),
            RenderState::InProgress("saving".to_string())
        );
    }

    #[tokio::test]
    async fn test_quota_error_carries_upstream_body() {
        let base = serve_one(Canned::json(429, r#"{"error":"quota"}"#)).await;
        let service = service(&base);

        let err = service.submit(&spec(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Provider { ref provider, ref message }
            if provider == "Shotstack" && message.contains("quota")));

        let err = service.status("r-42").await.unwrap_err();
        assert!(matches!(err, AppError::Provider { ref message, .. } if message.contains("quota")));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let base = closed_port().await;

        let err = service(&base).submit(&spec(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
