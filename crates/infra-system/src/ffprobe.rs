// ffprobe-backed MediaProbe
use async_trait::async_trait;
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::MediaProbe;
use std::path::Path;
use tracing::debug;

use crate::process::ProcessRunner;

pub struct FfprobeMediaProbe {
    ffprobe_bin: String,
    runner: ProcessRunner,
}

impl FfprobeMediaProbe {
    pub fn new(ffprobe_bin: impl Into<String>, runner: ProcessRunner) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
            runner,
        }
    }

    fn args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.display().to_string(),
        ]
    }
}

/// Parse ffprobe's bare `format=duration` output
pub fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .and_then(|l| l.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

#[async_trait]
impl MediaProbe for FfprobeMediaProbe {
    async fn duration_secs(&self, path: &Path) -> Result<f64> {
        let output = self.runner.run(&self.ffprobe_bin, &Self::args(path)).await?;

        if !output.success {
            return Err(AppError::Assembly(format!(
                "ffprobe failed on {}: {}",
                path.display(),
                output.stderr_tail(5)
            )));
        }

        let duration = parse_duration(&output.stdout).ok_or_else(|| {
            AppError::Assembly(format!(
                "ffprobe returned no duration for {}",
                path.display()
            ))
        })?;

        debug!(path = %path.display(), duration_secs = duration, "Probed media duration");
        Ok(duration)
    }
}
