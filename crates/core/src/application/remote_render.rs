// Remote-render assembly strategy
// Submits a timeline to a RenderService and polls it to a terminal state

use crate::application::pipeline::constants::{MAX_CLIP_SECONDS, MAX_TIMELINE_CLIPS};
use crate::application::poll::{poll_until, PollOutcome, PollPolicy};
use crate::domain::{ClipDescriptor, FinalArtifact, FootageArtifact};
use crate::error::{AppError, Result};
use crate::port::{
    AssemblyInput, AssemblyStrategy, OutputSpec, RenderService, RenderSpec, RenderState, Sleeper,
    TimelineClip, VideoAssembler,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RemoteRenderAssembler {
    render_service: Arc<dyn RenderService>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
    max_clips: usize,
    max_clip_secs: f64,
    output: OutputSpec,
    /// Base URL under which job audio is publicly reachable, if any
    soundtrack_base_url: Option<String>,
}

impl RemoteRenderAssembler {
    pub fn new(render_service: Arc<dyn RenderService>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            render_service,
            sleeper,
            policy: PollPolicy::default(),
            max_clips: MAX_TIMELINE_CLIPS,
            max_clip_secs: MAX_CLIP_SECONDS,
            output: OutputSpec::default(),
            soundtrack_base_url: None,
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_clips(mut self, max_clips: usize) -> Self {
        self.max_clips = max_clips.max(1);
        self
    }

    /// Public host serving `/jobs/{id}/audio` as raw MP3; without it the render has no soundtrack
    pub fn with_soundtrack_base_url(mut self, base_url: Option<String>) -> Self {
        self.soundtrack_base_url = base_url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    /// Lay clips back to back, each trimmed to at most `max_clip_secs`
    pub fn build_spec(&self, input: &AssemblyInput) -> Result<RenderSpec> {
        let clips: Vec<&ClipDescriptor> = match &input.footage {
            FootageArtifact::Clips(clips) => clips.iter().take(self.max_clips).collect(),
            FootageArtifact::Local { clip, .. } => vec![clip],
        };

        if clips.is_empty() {
            return Err(AppError::NotFound("No video clips found".to_string()));
        }

        let mut start = 0.0;
        let mut timeline = Vec::with_capacity(clips.len());
        for clip in clips {
            let length = if clip.duration_secs > 0.0 {
                clip.duration_secs.min(self.max_clip_secs)
            } else {
                self.max_clip_secs
            };
            timeline.push(TimelineClip {
                src: clip.url.clone(),
                start,
                length,
            });
            start += length;
        }

        let soundtrack_url = self
            .soundtrack_base_url
            .as_ref()
            .map(|base| format!("{}/jobs/{}/audio", base, input.job_id));

        Ok(RenderSpec {
            clips: timeline,
            fit: "cover".to_string(),
            soundtrack_url,
            output: self.output.clone(),
        })
    }
}

#[async_trait]
impl VideoAssembler for RemoteRenderAssembler {
    fn strategy(&self) -> AssemblyStrategy {
        AssemblyStrategy::RemoteRender
    }

    async fn assemble(&self, input: &AssemblyInput) -> Result<FinalArtifact> {
        let spec = self.build_spec(input)?;
        let render_id = self.render_service.submit(&spec).await?;

        info!(
            job_id = %input.job_id,
            render_id = %render_id,
            clips = spec.clips.len(),
            "Render submitted, polling for completion"
        );

        let render = Arc::clone(&self.render_service);
        let outcome = poll_until(self.policy, self.sleeper.as_ref(), |attempt| {
            let render = Arc::clone(&render);
            let render_id = render_id.clone();
            async move {
                match render.status(&render_id).await? {
                    RenderState::Done { url } => Ok(Some(Ok(url))),
                    RenderState::Failed { message } => Ok(Some(Err(message))),
                    RenderState::InProgress(stage) => {
                        tracing::debug!(render_id = %render_id, attempt, stage = %stage, "Render in progress");
                        Ok(None)
                    }
                }
            }
        })
        .await?;

        match outcome {
            PollOutcome::Ready {
                value: Ok(url),
                attempts,
            } => {
                info!(job_id = %input.job_id, render_id = %render_id, attempts, "Render done");
                Ok(FinalArtifact::Url(url))
            }
            PollOutcome::Ready {
                value: Err(message),
                ..
            } => {
                warn!(job_id = %input.job_id, render_id = %render_id, error = %message, "Render failed");
                Err(AppError::RenderFailed(message))
            }
            PollOutcome::Exhausted { attempts } => {
                warn!(job_id = %input.job_id, render_id = %render_id, attempts, "Render polling budget exhausted");
                Err(AppError::RenderTimeout { attempts })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AudioArtifact;
    use crate::port::render_service::mocks::ScriptedRenderService;
    use crate::port::time_provider::mocks::RecordingSleeper;
    use std::time::Duration;

    fn clip(id: &str, duration: f64) -> ClipDescriptor {
        ClipDescriptor {
            id: id.to_string(),
            url: format!("https://cdn.example/{}.mp4", id),
            duration_secs: duration,
        }
    }

    fn input(clips: Vec<ClipDescriptor>) -> AssemblyInput {
        AssemblyInput {
            job_id: "job-1".to_string(),
            audio: AudioArtifact::InMemory(Arc::new(vec![0u8; 4])),
            audio_duration_secs: None,
            footage: FootageArtifact::Clips(clips),
        }
    }

    #[test]
    fn test_build_spec_trims_and_places_clips() {
        let assembler = RemoteRenderAssembler::new(
            Arc::new(ScriptedRenderService::stuck()),
            Arc::new(RecordingSleeper::new()),
        );
        let spec = assembler
            .build_spec(&input(vec![
                clip("a", 12.0),
                clip("b", 3.0),
                clip("c", 8.0),
                clip("d", 9.0),
            ]))
            .unwrap();

        assert_eq!(spec.clips.len(), 3);
        assert_eq!(spec.clips[0].start, 0.0);
        assert_eq!(spec.clips[0].length, 5.0);
        assert_eq!(spec.clips[1].start, 5.0);
        assert_eq!(spec.clips[1].length, 3.0);
        assert_eq!(spec.clips[2].start, 8.0);
        assert_eq!(spec.fit, "cover");
        assert_eq!(spec.output.width, 1080);
        assert_eq!(spec.output.height, 1920);
        assert!(spec.soundtrack_url.is_none());
    }

    #[test]
    fn test_build_spec_soundtrack_url() {
        let assembler = RemoteRenderAssembler::new(
            Arc::new(ScriptedRenderService::stuck()),
            Arc::new(RecordingSleeper::new()),
        )
        .with_soundtrack_base_url(Some("https://reels.example/".to_string()));

        let spec = assembler.build_spec(&input(vec![clip("a", 4.0)])).unwrap();
        assert_eq!(
            spec.soundtrack_url.as_deref(),
            Some("https://reels.example/jobs/job-1/audio")
        );
    }

    #[tokio::test]
    async fn test_assemble_done_returns_url() {
        let service = Arc::new(ScriptedRenderService::new(vec![
            RenderState::InProgress("queued".to_string()),
            RenderState::InProgress("rendering".to_string()),
            RenderState::Done {
                url: "https://cdn.example/out.mp4".to_string(),
            },
        ]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let assembler = RemoteRenderAssembler::new(service.clone(), sleeper.clone());

        let artifact = assembler.assemble(&input(vec![clip("a", 6.0)])).await.unwrap();

        assert_eq!(
            artifact,
            FinalArtifact::Url("https://cdn.example/out.mp4".to_string())
        );
        assert_eq!(service.poll_count(), 3);
        assert_eq!(service.submitted().len(), 1);
        assert_eq!(sleeper.calls()[0], Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_assemble_failed_status() {
        let service = Arc::new(ScriptedRenderService::new(vec![RenderState::Failed {
            message: "invalid asset".to_string(),
        }]));
        let assembler =
            RemoteRenderAssembler::new(service, Arc::new(RecordingSleeper::new()));

        let err = assembler.assemble(&input(vec![clip("a", 6.0)])).await.unwrap_err();
        assert!(matches!(err, AppError::RenderFailed(ref m) if m == "invalid asset"));
    }

    #[tokio::test]
    async fn test_assemble_times_out() {
        let service = Arc::new(ScriptedRenderService::stuck());
        let sleeper = Arc::new(RecordingSleeper::new());
        let assembler = RemoteRenderAssembler::new(service.clone(), sleeper.clone());

        let err = assembler.assemble(&input(vec![clip("a", 6.0)])).await.unwrap_err();

        assert!(matches!(err, AppError::RenderTimeout { attempts: 60 }));
        assert!(err.to_string().contains("timed out"));
        assert_eq!(service.poll_count(), 60);
        assert_eq!(sleeper.calls().len(), 60);
    }

    #[tokio::test]
    async fn test_assemble_without_clips_fails_before_submit() {
        let service = Arc::new(ScriptedRenderService::stuck());
        let assembler =
            RemoteRenderAssembler::new(service.clone(), Arc::new(RecordingSleeper::new()));

        assert!(assembler.assemble(&input(vec![])).await.is_err());
        assert!(service.submitted().is_empty());
    }
}
