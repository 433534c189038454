// External tool runner (ffmpeg / ffprobe)
// reason: tokio::process so encodes suspend instead of blocking the runtime
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use reelforge_core::error::{AppError, Result};
use reelforge_core::port::TimeProvider;

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Last `max_lines` lines of stderr (ffmpeg prints its error at the end)
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Spawns a tool, waits for it, and captures its output
pub struct ProcessRunner {
    time_provider: Arc<dyn TimeProvider>,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a new runner
    ///
    /// # Example
    /// ```ignore
    /// let runner = ProcessRunner::new(Arc::new(SystemTimeProvider), None);
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, timeout: Option<Duration>) -> Self {
        Self {
            time_provider,
            timeout,
        }
    }

    /// Run `program` with `args`
    ///
    /// # Errors
    /// - AppError::Assembly if the process cannot be spawned or exceeds the timeout
    /// - AppError::Io if waiting on the process fails
    ///
    /// A non-zero exit is NOT an error here; callers inspect `success`.
    pub async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        let start_time = self.time_provider.now_millis();

        debug!(program = %program, args = ?args, "Starting subprocess");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Assembly(format!("failed to spawn {}: {}", program, e)))?;

        let output = match self.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(AppError::Assembly(format!(
                        "{} timed out after {}s",
                        program,
                        limit.as_secs()
                    )))
                }
            },
            None => child.wait_with_output().await?,
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = ProcessOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            duration_ms,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        info!(
            program = %program,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            "Subprocess completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelforge_core::port::time_provider::SystemTimeProvider;

    #[tokio::test]
    async fn test_run_success_captures_stdout() {
        let runner = ProcessRunner::new(Arc::new(SystemTimeProvider), None);
        let output = runner.run("echo", &["hello".to_string()]).await.unwrap();

        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let runner = ProcessRunner::new(Arc::new(SystemTimeProvider), None);
        let output = runner.run("false", &[]).await.unwrap();
        assert!(!output.success);
    }

    #[tokio::test]
    async fn test_missing_binary_fails_to_spawn() {
        let runner = ProcessRunner::new(Arc::new(SystemTimeProvider), None);
        let err = runner
            .run("reelforge-definitely-not-a-binary", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Assembly(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = ProcessRunner::new(
            Arc::new(SystemTimeProvider),
            Some(Duration::from_millis(100)),
        );
        let err = runner.run("sleep", &["10".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_stderr_tail() {
        let output = ProcessOutput {
            success: false,
            exit_code: Some(1),
            duration_ms: 0,
            stdout: String::new(),
            stderr: "a\nb\nc\nd".to_string(),
        };
        assert_eq!(output.stderr_tail(2), "c\nd");
        assert_eq!(output.stderr_tail(10), "a\nb\nc\nd");
    }
}
