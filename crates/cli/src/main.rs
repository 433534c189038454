//! Reelforge CLI - Command-line client for the Reelforge daemon

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "reelforge")]
#[command(about = "Reelforge short-video generator CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "REELFORGE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new video job
    Create {
        /// What the video is about
        topic: String,

        /// Template / footage category (motivational, tech, food, ...)
        #[arg(short, long)]
        template: Option<String>,

        /// Voice key (female_1, female_2, male_1, male_2)
        #[arg(short, long)]
        voice: Option<String>,

        /// Target length: short, medium or long
        #[arg(short, long)]
        duration: Option<String>,

        /// Follow the job until it finishes
        #[arg(long)]
        wait: bool,
    },

    /// Show one job's status
    Status {
        /// Job ID
        job_id: String,
    },

    /// Follow a job until it completes or fails
    Wait {
        /// Job ID
        job_id: String,

        /// Seconds between status checks
        #[arg(long, default_value = "2")]
        interval: u64,

        /// Give up after this many seconds
        #[arg(long, default_value = "600")]
        timeout: u64,
    },

    /// Save the voiceover MP3
    Audio {
        /// Job ID
        job_id: String,

        /// Output file (default: <job_id>.mp3)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show where the finished video is
    Final {
        /// Job ID
        job_id: String,
    },

    /// List recent jobs
    List {
        /// Maximum number of jobs to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct CreateResult {
    job_id: String,
    status: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusView {
    job_id: String,
    status: String,
    status_message: String,
    topic: String,
    template: String,
    duration: String,
    #[serde(default)]
    script: Option<String>,
    has_audio: bool,
    has_final: bool,
}

impl StatusView {
    fn is_terminal(&self) -> bool {
        self.status == "completed" || self.status == "failed"
    }
}

#[derive(Tabled)]
struct JobRow {
    job_id: String,
    status: String,
    template: String,
    duration: String,
    message: String,
}

impl From<StatusView> for JobRow {
    fn from(view: StatusView) -> Self {
        Self {
            job_id: view.job_id,
            status: view.status,
            template: view.template,
            duration: view.duration,
            message: view.status_message,
        }
    }
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

async fn fetch_status(url: &str, job_id: &str) -> Result<StatusView> {
    let result = call_rpc(url, "video.status.v1", json!({ "job_id": job_id })).await?;
    Ok(serde_json::from_value(result)?)
}

fn colored_status(status: &str) -> colored::ColoredString {
    match status {
        "completed" => status.green().bold(),
        "failed" => status.red().bold(),
        "queued" => status.yellow(),
        _ => status.cyan(),
    }
}

fn print_status(view: &StatusView) {
    println!("  {} {}", "Job:".bold(), view.job_id);
    println!("  {} {}", "Topic:".bold(), view.topic);
    println!("  {} {}", "Status:".bold(), colored_status(&view.status));
    println!("  {} {}", "Message:".bold(), view.status_message);
    println!(
        "  {} audio={} final={}",
        "Artifacts:".bold(),
        view.has_audio,
        view.has_final
    );
    if let Some(script) = &view.script {
        println!();
        println!("{}", "Script:".bold());
        println!("{}", script);
    }
}

async fn wait_for(url: &str, job_id: &str, interval: Duration, timeout: Duration) -> Result<StatusView> {
    let deadline = tokio::time::Instant::now() + timeout;
    let mut last_status = String::new();

    loop {
        let view = fetch_status(url, job_id).await?;
        if view.status != last_status {
            println!("  {} {}", colored_status(&view.status), view.status_message.dimmed());
            last_status = view.status.clone();
        }
        if view.is_terminal() {
            return Ok(view);
        }
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("Gave up waiting for job {} after {}s", job_id, timeout.as_secs());
        }
        tokio::time::sleep(interval).await;
    }
}

fn report_outcome(view: &StatusView) {
    println!();
    if view.status == "completed" {
        println!("{}", "✓ Video ready".green().bold());
        println!("  Run `reelforge final {}` for its location", view.job_id);
    } else {
        println!("{}", format!("✗ {}", view.status_message).red().bold());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            topic,
            template,
            voice,
            duration,
            wait,
        } => {
            let params = json!({
                "topic": topic,
                "template": template,
                "voice": voice,
                "duration": duration,
            });

            let result = call_rpc(&cli.rpc_url, "video.create.v1", params).await?;
            let created: CreateResult = serde_json::from_value(result)?;
            let job_id = created.job_id.clone();

            println!("{}", "✓ Job created".green().bold());
            println!();
            println!("{}", Table::new(vec![created]));

            if wait {
                println!();
                let view = wait_for(
                    &cli.rpc_url,
                    &job_id,
                    Duration::from_secs(2),
                    Duration::from_secs(600),
                )
                .await?;
                report_outcome(&view);
            }
        }

        Commands::Status { job_id } => {
            let view = fetch_status(&cli.rpc_url, &job_id).await?;
            print_status(&view);
        }

        Commands::Wait {
            job_id,
            interval,
            timeout,
        } => {
            let view = wait_for(
                &cli.rpc_url,
                &job_id,
                Duration::from_secs(interval.max(1)),
                Duration::from_secs(timeout),
            )
            .await?;
            report_outcome(&view);
        }

        Commands::Audio { job_id, out } => {
            let result = call_rpc(&cli.rpc_url, "video.audio.v1", json!({ "job_id": job_id })).await?;
            let encoded = result["audio_base64"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Response had no audio"))?;
            let bytes = STANDARD.decode(encoded).context("Invalid audio encoding")?;

            let path = out.unwrap_or_else(|| PathBuf::from(format!("{}.mp3", job_id)));
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!(
                "{}",
                format!("✓ Saved {} bytes to {}", bytes.len(), path.display())
                    .green()
                    .bold()
            );
        }

        Commands::Final { job_id } => {
            let result = call_rpc(&cli.rpc_url, "video.final.v1", json!({ "job_id": job_id })).await?;

            if let Some(url) = result["url"].as_str() {
                println!("  {} {}", "URL:".bold(), url);
            } else if let Some(path) = result["path"].as_str() {
                println!("  {} {}", "File:".bold(), path);
            } else {
                println!("{}", "No location in response".yellow());
            }
        }

        Commands::List { limit } => {
            let result = call_rpc(&cli.rpc_url, "video.list.v1", json!({ "limit": limit })).await?;
            let jobs: Vec<StatusView> = serde_json::from_value(result["jobs"].clone())?;

            if jobs.is_empty() {
                println!("{}", "No jobs yet".yellow());
            } else {
                println!(
                    "{}",
                    format!("{} of {} jobs", jobs.len(), result["total"]).cyan().bold()
                );
                println!();
                let rows: Vec<JobRow> = jobs.into_iter().map(JobRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}
