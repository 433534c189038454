// Pipeline Orchestrator - drives one job through every stage

pub mod constants;

use constants::*;

use crate::domain::{Job, JobStatus};
use crate::error::{AppError, Result};
use crate::port::{
    ArtifactStore, AssemblyInput, FootageRequest, FootageSource, JobStore, MediaProbe,
    ScriptGenerator, TimeProvider, VideoAssembler, VoiceSynthesizer,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The four provider capabilities a pipeline run needs
#[derive(Clone)]
pub struct PipelineAdapters {
    pub script: Arc<dyn ScriptGenerator>,
    pub voice: Arc<dyn VoiceSynthesizer>,
    pub footage: Arc<dyn FootageSource>,
    pub assembler: Arc<dyn VideoAssembler>,
}

/// Runs the linear stage sequence for a job
///
/// queued -> generating_script -> generating_voice -> fetching_footage ->
/// assembling_video -> completed, or failed on the first stage error.
/// All progress is communicated through JobStore writes.
pub struct Orchestrator {
    job_store: Arc<dyn JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
    adapters: PipelineAdapters,
    media_probe: Option<Arc<dyn MediaProbe>>,
    time_provider: Arc<dyn TimeProvider>,
    clip_count: usize,
}

impl Orchestrator {
    /// Create an orchestrator
    ///
    /// # Errors
    /// AppError::Config if the assembler is local-mux and no MediaProbe is given
    pub fn new(
        job_store: Arc<dyn JobStore>,
        artifacts: Arc<dyn ArtifactStore>,
        adapters: PipelineAdapters,
        media_probe: Option<Arc<dyn MediaProbe>>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        if adapters.assembler.strategy().requires_audio_probe() && media_probe.is_none() {
            return Err(AppError::Config(
                "local-mux assembly requires a media probe".to_string(),
            ));
        }

        Ok(Self {
            job_store,
            artifacts,
            adapters,
            media_probe,
            time_provider,
            clip_count: MAX_TIMELINE_CLIPS,
        })
    }

    pub fn with_clip_count(mut self, clip_count: usize) -> Self {
        self.clip_count = clip_count.max(1);
        self
    }

    /// Run the pipeline for `job_id` to completion or failure
    ///
    /// Never returns an error: stage failures become a terminal `failed` job.
    pub async fn run_pipeline(&self, job_id: &str) {
        let mut job = match self.job_store.find_by_id(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                warn!(job_id = %job_id, "Pipeline started for unknown job");
                return;
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Failed to load job");
                return;
            }
        };

        if job.status != JobStatus::Queued {
            warn!(job_id = %job_id, status = %job.status, "Pipeline already ran for job");
            return;
        }

        info!(job_id = %job.id, topic = %job.params.topic, "Pipeline started");

        match self.execute(&mut job).await {
            Ok(()) => info!(job_id = %job.id, "Pipeline completed"),
            Err(e) => self.mark_failed(&mut job, e).await,
        }
    }

    async fn execute(&self, job: &mut Job) -> Result<()> {
        // Stage 1: script
        self.transition(job, JobStatus::GeneratingScript, MSG_GENERATING_SCRIPT)
            .await?;
        let script = self
            .adapters
            .script
            .generate(&job.params.topic, job.params.duration)
            .await?;
        info!(job_id = %job.id, words = script.split_whitespace().count(), "Script generated");
        job.script = Some(script);

        // Stage 2: voice
        self.transition(job, JobStatus::GeneratingVoice, MSG_GENERATING_VOICE)
            .await?;
        let script = job.script.as_deref().unwrap_or_default();
        let audio_bytes = self
            .adapters
            .voice
            .synthesize(script, &job.params.voice)
            .await?;
        let audio_len = audio_bytes.len();
        let audio = self.artifacts.store_audio(&job.id, audio_bytes).await?;
        job.audio = Some(audio);
        self.save(job).await?;
        info!(job_id = %job.id, bytes = audio_len, "Voiceover synthesized");

        // Local mux only: exact voiceover length drives footage and trimming
        if let Some(probe) = self.probe_for_strategy() {
            let path = job
                .audio
                .as_ref()
                .and_then(|a| a.path())
                .ok_or_else(|| {
                    AppError::Internal("local-mux audio must be file-backed".to_string())
                })?
                .clone();
            let duration = probe.duration_secs(&path).await?;
            info!(job_id = %job.id, duration_secs = duration, "Voiceover duration probed");
            job.audio_duration_secs = Some(duration);
        }

        // Stage 3: footage
        self.transition(job, JobStatus::FetchingFootage, MSG_FETCHING_FOOTAGE)
            .await?;
        let request = FootageRequest {
            job_id: job.id.clone(),
            template: job.params.template.clone(),
            count: self.clip_count,
            min_duration_secs: job.audio_duration_secs,
        };
        let footage = self.adapters.footage.fetch(&request).await?;
        info!(job_id = %job.id, clips = footage.clip_count(), "Footage fetched");
        job.footage = Some(footage);

        // Stage 4: assembly
        self.transition(job, JobStatus::AssemblingVideo, MSG_ASSEMBLING_VIDEO)
            .await?;
        let input = AssemblyInput {
            job_id: job.id.clone(),
            audio: job
                .audio
                .clone()
                .ok_or_else(|| AppError::Internal("audio missing before assembly".to_string()))?,
            audio_duration_secs: job.audio_duration_secs,
            footage: job
                .footage
                .clone()
                .ok_or_else(|| AppError::Internal("footage missing before assembly".to_string()))?,
        };
        let final_artifact = self.adapters.assembler.assemble(&input).await?;
        info!(job_id = %job.id, artifact = ?final_artifact, "Video assembled");
        job.final_artifact = Some(final_artifact);

        self.transition(job, JobStatus::Completed, MSG_COMPLETED)
            .await
    }

    fn probe_for_strategy(&self) -> Option<&Arc<dyn MediaProbe>> {
        if self.adapters.assembler.strategy().requires_audio_probe() {
            self.media_probe.as_ref()
        } else {
            None
        }
    }

    /// Advance status and persist together with any artifact recorded so far
    ///
    /// The in-memory record only moves once the store accepted the new status,
    /// so a rejected write still leaves the job failable.
    async fn transition(&self, job: &mut Job, to: JobStatus, message: &str) -> Result<()> {
        let mut next = job.clone();
        next.advance(to, message, self.time_provider.now_millis())?;
        self.save(&mut next).await?;
        *job = next;
        info!(job_id = %job.id, status = %to, "{}", message);
        Ok(())
    }

    async fn save(&self, job: &mut Job) -> Result<()> {
        job.updated_at = self.time_provider.now_millis();
        self.job_store.update(job).await
    }

    async fn mark_failed(&self, job: &mut Job, cause: AppError) {
        error!(job_id = %job.id, stage = %job.status, error = %cause, "Pipeline failed");

        let now = self.time_provider.now_millis();
        if let Err(e) = job.fail(format!("Error: {}", cause), now) {
            error!(job_id = %job.id, error = %e, "Cannot mark job failed");
            return;
        }
        if let Err(e) = self.job_store.update(job).await {
            error!(job_id = %job.id, error = %e, "Failed to persist failed job");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClipDescriptor, FinalArtifact, FootageArtifact, JobParams, TargetDuration};
    use crate::port::artifact_store::mocks::MockArtifactStore;
    use crate::port::footage_source::mocks::{MockFootage, MockFootageSource};
    use crate::port::job_store::mocks::MockJobStore;
    use crate::port::media_probe::mocks::MockMediaProbe;
    use crate::port::script_generator::mocks::MockScriptGenerator;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use crate::port::video_assembler::mocks::MockVideoAssembler;
    use crate::port::voice_synthesizer::mocks::MockVoiceSynthesizer;
    use crate::port::AssemblyStrategy;

    fn clips() -> FootageArtifact {
        FootageArtifact::Clips(vec![ClipDescriptor {
            id: "1".to_string(),
            url: "https://cdn.example/1.mp4".to_string(),
            duration_secs: 8.0,
        }])
    }

    fn remote_assembler() -> Arc<MockVideoAssembler> {
        Arc::new(MockVideoAssembler::new_success(
            AssemblyStrategy::RemoteRender,
            FinalArtifact::Url("https://cdn.example/final.mp4".to_string()),
        ))
    }

    fn adapters(
        script: Arc<MockScriptGenerator>,
        voice: Arc<MockVoiceSynthesizer>,
        footage: Arc<MockFootageSource>,
        assembler: Arc<MockVideoAssembler>,
    ) -> PipelineAdapters {
        PipelineAdapters {
            script,
            voice,
            footage,
            assembler,
        }
    }

    async fn seed(store: &MockJobStore) -> String {
        let job = Job::new(
            "job-1",
            1000,
            JobParams {
                topic: "coffee brewing".to_string(),
                template: "food".to_string(),
                voice: "female_1".to_string(),
                duration: TargetDuration::Short,
            },
        );
        store.insert(&job).await.unwrap();
        job.id
    }

    #[tokio::test]
    async fn test_happy_path_remote() {
        let store = Arc::new(MockJobStore::new());
        let id = seed(&store).await;
        let script = Arc::new(MockScriptGenerator::new_success("hook line. body."));
        let assembler = remote_assembler();

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                script.clone(),
                Arc::new(MockVoiceSynthesizer::new_success(vec![7; 16])),
                Arc::new(MockFootageSource::new(MockFootage::Found(clips()))),
                assembler.clone(),
            ),
            None,
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.status_message, MSG_COMPLETED);
        assert_eq!(job.script.as_deref(), Some("hook line. body."));
        assert!(job.has_audio());
        assert!(job.audio_duration_secs.is_none());
        assert_eq!(
            job.final_artifact,
            Some(FinalArtifact::Url("https://cdn.example/final.mp4".to_string()))
        );
        assert_eq!(script.last_duration(), Some(TargetDuration::Short));
        assert_eq!(assembler.inputs().len(), 1);

        assert_eq!(
            store.status_history(&id),
            vec![
                JobStatus::Queued,
                JobStatus::GeneratingScript,
                JobStatus::GeneratingVoice,
                JobStatus::FetchingFootage,
                JobStatus::AssemblingVideo,
                JobStatus::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_script_failure_stops_pipeline() {
        let store = Arc::new(MockJobStore::new());
        let id = seed(&store).await;
        let voice = Arc::new(MockVoiceSynthesizer::new_success(vec![1]));

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                Arc::new(MockScriptGenerator::new_fail("{\"error\":\"quota exceeded\"}")),
                voice.clone(),
                Arc::new(MockFootageSource::new(MockFootage::Found(clips()))),
                remote_assembler(),
            ),
            None,
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.status_message.starts_with("Error: "));
        assert!(job.status_message.contains("quota exceeded"));
        assert!(job.script.is_none());
        assert!(!job.has_audio());
        assert_eq!(voice.call_count(), 0);
        assert_eq!(
            store.status_history(&id),
            vec![JobStatus::Queued, JobStatus::GeneratingScript, JobStatus::Failed]
        );
    }

    #[tokio::test]
    async fn test_no_footage_keeps_audio() {
        let store = Arc::new(MockJobStore::new());
        let id = seed(&store).await;
        let assembler = remote_assembler();

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                Arc::new(MockScriptGenerator::new_success("script")),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1, 2, 3])),
                Arc::new(MockFootageSource::new(MockFootage::Empty)),
                assembler.clone(),
            ),
            None,
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.status_message.contains("No video clips found"));
        assert!(job.has_audio());
        assert!(job.footage.is_none());
        assert!(job.final_artifact.is_none());
        assert!(assembler.inputs().is_empty());
    }

    #[tokio::test]
    async fn test_local_mux_probes_between_voice_and_footage() {
        struct FileArtifacts;

        #[async_trait::async_trait]
        impl ArtifactStore for FileArtifacts {
            async fn store_audio(
                &self,
                job_id: &str,
                _audio: Vec<u8>,
            ) -> Result<crate::domain::AudioArtifact> {
                Ok(crate::domain::AudioArtifact::File(
                    format!("/tmp/{}_audio.mp3", job_id).into(),
                ))
            }
            async fn load_audio(
                &self,
                _artifact: &crate::domain::AudioArtifact,
            ) -> Result<Option<Vec<u8>>> {
                Ok(None)
            }
            async fn final_available(&self, _artifact: &FinalArtifact) -> bool {
                true
            }
        }

        let store = Arc::new(MockJobStore::new());
        let id = seed(&store).await;
        let probe = Arc::new(MockMediaProbe::new(27.5));
        let footage = Arc::new(MockFootageSource::new(MockFootage::Found(
            FootageArtifact::Local {
                clip: ClipDescriptor {
                    id: "9".to_string(),
                    url: "https://cdn.example/9.mp4".to_string(),
                    duration_secs: 12.0,
                },
                path: "/tmp/job-1_footage.mp4".into(),
            },
        )));
        let assembler = Arc::new(MockVideoAssembler::new_success(
            AssemblyStrategy::LocalMux,
            FinalArtifact::File("/tmp/job-1_final.mp4".into()),
        ));

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(FileArtifacts),
            adapters(
                Arc::new(MockScriptGenerator::new_success("script")),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1, 2, 3])),
                footage.clone(),
                assembler.clone(),
            ),
            Some(probe.clone()),
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.audio_duration_secs, Some(27.5));
        assert_eq!(probe.call_count(), 1);
        assert_eq!(footage.requests()[0].min_duration_secs, Some(27.5));
        assert_eq!(assembler.inputs()[0].audio_duration_secs, Some(27.5));
    }

    #[tokio::test]
    async fn test_remote_strategy_never_probes() {
        let store = Arc::new(MockJobStore::new());
        let id = seed(&store).await;
        let probe = Arc::new(MockMediaProbe::new(10.0));

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                Arc::new(MockScriptGenerator::new_success("script")),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1])),
                Arc::new(MockFootageSource::new(MockFootage::Found(clips()))),
                remote_assembler(),
            ),
            Some(probe.clone()),
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        assert_eq!(probe.call_count(), 0);
        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn test_local_mux_without_probe_is_config_error() {
        let assembler = Arc::new(MockVideoAssembler::new_success(
            AssemblyStrategy::LocalMux,
            FinalArtifact::File("/tmp/out.mp4".into()),
        ));
        let result = Orchestrator::new(
            Arc::new(MockJobStore::new()),
            Arc::new(MockArtifactStore::new()),
            adapters(
                Arc::new(MockScriptGenerator::new_success("s")),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1])),
                Arc::new(MockFootageSource::new(MockFootage::Empty)),
                assembler,
            ),
            None,
            Arc::new(FixedTimeProvider::new(0)),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_assembly_failure_has_no_final_artifact() {
        let store = Arc::new(MockJobStore::new());
        let id = seed(&store).await;

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                Arc::new(MockScriptGenerator::new_success("script")),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1])),
                Arc::new(MockFootageSource::new(MockFootage::Found(clips()))),
                Arc::new(MockVideoAssembler::new_fail(
                    AssemblyStrategy::RemoteRender,
                    "ffmpeg exited with status 1",
                )),
            ),
            None,
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.status_message.contains("ffmpeg exited with status 1"));
        assert!(job.footage.is_some());
        assert!(job.final_artifact.is_none());
    }

    #[tokio::test]
    async fn test_rejected_completion_write_still_fails_job() {
        let store = Arc::new(MockJobStore::new().reject_updates_to(JobStatus::Completed));
        let id = seed(&store).await;

        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                Arc::new(MockScriptGenerator::new_success("s")),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1])),
                Arc::new(MockFootageSource::new(MockFootage::Found(clips()))),
                remote_assembler(),
            ),
            None,
            Arc::new(FixedTimeProvider::new(5000)),
        )
        .unwrap();

        orchestrator.run_pipeline(&id).await;

        let job = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.status_message.contains("store rejected status completed"));
        assert_eq!(
            store.status_history(&id).last(),
            Some(&JobStatus::Failed)
        );
    }

    #[tokio::test]
    async fn test_unknown_job_is_ignored() {
        let store = Arc::new(MockJobStore::new());
        let script = Arc::new(MockScriptGenerator::new_success("s"));
        let orchestrator = Orchestrator::new(
            store.clone(),
            Arc::new(MockArtifactStore::new()),
            adapters(
                script.clone(),
                Arc::new(MockVoiceSynthesizer::new_success(vec![1])),
                Arc::new(MockFootageSource::new(MockFootage::Empty)),
                remote_assembler(),
            ),
            None,
            Arc::new(FixedTimeProvider::new(0)),
        )
        .unwrap();

        orchestrator.run_pipeline("missing").await;
        assert_eq!(script.call_count(), 0);
        assert_eq!(store.len().await.unwrap(), 0);
    }
}
