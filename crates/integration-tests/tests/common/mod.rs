//! Shared fixtures for scenario tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reelforge_core::application::{JobService, Orchestrator, PipelineAdapters};
use reelforge_core::domain::{ClipDescriptor, FootageArtifact, JobStatus, JobStatusView};
use reelforge_core::port::footage_source::mocks::{MockFootage, MockFootageSource};
use reelforge_core::port::id_provider::mocks::SequentialIdProvider;
use reelforge_core::port::script_generator::mocks::MockScriptGenerator;
use reelforge_core::port::time_provider::SystemTimeProvider;
use reelforge_core::port::voice_synthesizer::mocks::MockVoiceSynthesizer;
use reelforge_core::port::{ArtifactStore, JobStore, MediaProbe, VideoAssembler};

pub const SCRIPT: &str = "Ever wondered why coffee tastes better at home? Here is the secret.";
pub const AUDIO: &[u8] = b"ID3\x04fake-mp3-frames";

pub fn remote_clips(n: usize) -> FootageArtifact {
    FootageArtifact::Clips(
        (0..n)
            .map(|i| ClipDescriptor {
                id: format!("{}", 100 + i),
                url: format!("https://cdn.example/{}.mp4", 100 + i),
                duration_secs: 4.0 + i as f64 * 2.0,
            })
            .collect(),
    )
}

/// Adapters for every stage except assembly
pub struct StageMocks {
    pub script: Arc<MockScriptGenerator>,
    pub voice: Arc<MockVoiceSynthesizer>,
    pub footage: Arc<MockFootageSource>,
}

impl StageMocks {
    pub fn happy(footage: FootageArtifact) -> Self {
        Self {
            script: Arc::new(MockScriptGenerator::new_success(SCRIPT)),
            voice: Arc::new(MockVoiceSynthesizer::new_success(AUDIO.to_vec())),
            footage: Arc::new(MockFootageSource::new(MockFootage::Found(footage))),
        }
    }

    pub fn with_footage(mut self, footage: MockFootage) -> Self {
        self.footage = Arc::new(MockFootageSource::new(footage));
        self
    }

    pub fn with_script(mut self, script: MockScriptGenerator) -> Self {
        self.script = Arc::new(script);
        self
    }
}

pub fn build_service(
    store: Arc<dyn JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
    mocks: &StageMocks,
    assembler: Arc<dyn VideoAssembler>,
    probe: Option<Arc<dyn MediaProbe>>,
) -> JobService {
    let time = Arc::new(SystemTimeProvider);
    let orchestrator = Orchestrator::new(
        store.clone(),
        artifacts.clone(),
        PipelineAdapters {
            script: mocks.script.clone(),
            voice: mocks.voice.clone(),
            footage: mocks.footage.clone(),
            assembler,
        },
        probe,
        time.clone(),
    )
    .expect("orchestrator wiring");

    JobService::new(
        store,
        artifacts,
        Arc::new(orchestrator),
        Arc::new(SequentialIdProvider::new()),
        time,
    )
}

/// Poll the query surface until the job is completed or failed
pub async fn wait_terminal(service: &JobService, job_id: &str) -> JobStatusView {
    for _ in 0..500 {
        let view = service.get_status(job_id).await.expect("status");
        if view.status.is_terminal() {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal status", job_id);
}

pub fn assert_ordered(history: &[JobStatus]) {
    for pair in history.windows(2) {
        assert!(
            pair[1] == JobStatus::Failed || pair[1].ordinal() > pair[0].ordinal(),
            "status went backwards: {:?}",
            history
        );
    }
}

/// Write an executable shell script standing in for an external tool
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}
