// Local-mux assembly strategy (ffmpeg)
use async_trait::async_trait;
use reelforge_core::domain::{AudioArtifact, FinalArtifact, FootageArtifact};
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::{AssemblyInput, AssemblyStrategy, VideoAssembler};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::process::ProcessRunner;

/// Fixed encode targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxSettings {
    pub width: u32,
    pub height: u32,
    pub video_codec: String,
    pub preset: String,
    pub video_bitrate: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for MuxSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            video_bitrate: "4M".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Loops the footage under the voiceover and trims to the voiceover length
pub struct FfmpegMuxAssembler {
    ffmpeg_bin: String,
    output_dir: PathBuf,
    runner: ProcessRunner,
    settings: MuxSettings,
}

impl FfmpegMuxAssembler {
    pub fn new(
        ffmpeg_bin: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        runner: ProcessRunner,
    ) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            output_dir: output_dir.into(),
            runner,
            settings: MuxSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: MuxSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn output_path(&self, job_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}_final.mp4", job_id))
    }

    /// ffmpeg arguments for one mux
    pub fn build_args(
        &self,
        video: &Path,
        audio: &Path,
        duration_secs: f64,
        output: &Path,
    ) -> Vec<String> {
        let s = &self.settings;
        let filter = format!(
            "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
            w = s.width,
            h = s.height
        );

        [
            "-y",
            "-stream_loop",
            "-1",
            "-i",
            &video.display().to_string(),
            "-i",
            &audio.display().to_string(),
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-vf",
            &filter,
            "-c:v",
            &s.video_codec,
            "-preset",
            &s.preset,
            "-b:v",
            &s.video_bitrate,
            "-c:a",
            &s.audio_codec,
            "-b:a",
            &s.audio_bitrate,
            "-t",
            &format!("{:.3}", duration_secs),
            "-movflags",
            "+faststart",
            &output.display().to_string(),
        ]
        .iter()
        .map(|a| a.to_string())
        .collect()
    }
}

#[async_trait]
impl VideoAssembler for FfmpegMuxAssembler {
    fn strategy(&self) -> AssemblyStrategy {
        AssemblyStrategy::LocalMux
    }

    async fn assemble(&self, input: &AssemblyInput) -> Result<FinalArtifact> {
        let video = match &input.footage {
            FootageArtifact::Local { path, .. } => path,
            FootageArtifact::Clips(_) => {
                return Err(AppError::Assembly(
                    "local mux needs downloaded footage".to_string(),
                ))
            }
        };
        let audio = match &input.audio {
            AudioArtifact::File(path) => path,
            AudioArtifact::InMemory(_) => {
                return Err(AppError::Assembly(
                    "local mux needs file-backed audio".to_string(),
                ))
            }
        };
        let duration = input.audio_duration_secs.ok_or_else(|| {
            AppError::Assembly("audio duration was not probed".to_string())
        })?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output = self.output_path(&input.job_id);
        let args = self.build_args(video, audio, duration, &output);

        info!(
            job_id = %input.job_id,
            duration_secs = duration,
            output = %output.display(),
            "Muxing video"
        );

        let result = self.runner.run(&self.ffmpeg_bin, &args).await?;
        if !result.success {
            warn!(job_id = %input.job_id, exit_code = ?result.exit_code, "ffmpeg failed");
            return Err(AppError::Assembly(format!(
                "ffmpeg exited with code {}: {}",
                result
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                result.stderr_tail(5)
            )));
        }

        Ok(FinalArtifact::File(output))
    }
}
