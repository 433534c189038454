//! Reelforge - Main Entry Point
//! JSON-RPC server + per-job pipeline tasks + artifact retention sweep

mod config;
mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::DaemonConfig;
use reelforge_api_rpc::RpcServer;
use reelforge_core::application::{
    shutdown_channel, JobService, Orchestrator, PipelineAdapters, RemoteRenderAssembler,
    RetentionScheduler,
};
use reelforge_core::port::id_provider::UuidProvider;
use reelforge_core::port::time_provider::{SystemTimeProvider, TokioSleeper};
use reelforge_core::port::{
    ArtifactStore, AssemblyStrategy, FootageSource, MediaProbe, TimeProvider, VideoAssembler,
};
use reelforge_infra_http::{
    build_client, ElevenLabsVoiceSynthesizer, FootageMode, HttpClient, OpenAiScriptGenerator,
    PexelsFootageSource, ShotstackRenderService,
};
use reelforge_infra_memory::{InMemoryJobStore, MemoryArtifactStore};
use reelforge_infra_system::{
    FfmpegMuxAssembler, FfprobeMediaProbe, FsArtifactRetention, FsArtifactStore, ProcessRunner,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ffprobe answers in well under a second; a hung probe should not pin a job forever
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Strategy-specific adapters
struct AssemblyWiring {
    artifacts: Arc<dyn ArtifactStore>,
    footage: Arc<dyn FootageSource>,
    assembler: Arc<dyn VideoAssembler>,
    media_probe: Option<Arc<dyn MediaProbe>>,
}

fn wire_assembly(
    config: &DaemonConfig,
    client: &HttpClient,
    time_provider: Arc<dyn TimeProvider>,
) -> Result<AssemblyWiring> {
    match config.assembly {
        AssemblyStrategy::LocalMux => {
            let footage = PexelsFootageSource::new(
                client.clone(),
                config.keys.pexels.clone(),
                FootageMode::Download {
                    dir: config.artifact_dir.clone(),
                    selection: config.footage_selection,
                },
            );
            let assembler = FfmpegMuxAssembler::new(
                config.ffmpeg_bin.clone(),
                config.artifact_dir.clone(),
                ProcessRunner::new(time_provider.clone(), None),
            );
            let probe = FfprobeMediaProbe::new(
                config.ffprobe_bin.clone(),
                ProcessRunner::new(time_provider, Some(PROBE_TIMEOUT)),
            );

            Ok(AssemblyWiring {
                artifacts: Arc::new(FsArtifactStore::new(config.artifact_dir.clone())),
                footage: Arc::new(footage),
                assembler: Arc::new(assembler),
                media_probe: Some(Arc::new(probe)),
            })
        }
        AssemblyStrategy::RemoteRender => {
            let key = config
                .keys
                .shotstack
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SHOTSTACK_API_KEY is not set"))?;
            let render = ShotstackRenderService::new(client.clone(), key, config.shotstack_env);
            let assembler = RemoteRenderAssembler::new(Arc::new(render), Arc::new(TokioSleeper))
                .with_soundtrack_base_url(config.public_audio_base_url.clone());

            Ok(AssemblyWiring {
                artifacts: Arc::new(MemoryArtifactStore::new()),
                footage: Arc::new(PexelsFootageSource::new(
                    client.clone(),
                    config.keys.pexels.clone(),
                    FootageMode::Descriptors,
                )),
                assembler: Arc::new(assembler),
                media_probe: None,
            })
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format =
        std::env::var("REELFORGE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("reelforge=info"))?;

    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stdout());
    let otel_layer = telemetry::layer()?;
    let otel_enabled = otel_layer.is_some();
    let registry = tracing_subscriber::registry()
        .with(otel_layer)
        .with(env_filter);

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            registry.with(fmt::layer().json().with_writer(writer)).init();
        }
        _ => {
            // Development: Pretty formatting with colors
            registry.with(fmt::layer().pretty().with_writer(writer)).init();
        }
    }

    info!("Reelforge v{} starting...", VERSION);
    telemetry::report(otel_enabled);

    // 2. Load configuration
    let config = DaemonConfig::from_env()?;
    info!(
        assembly = ?config.assembly,
        artifact_dir = %config.artifact_dir.display(),
        footage_selection = ?config.footage_selection,
        "Configuration loaded"
    );
    if config.remote_render_is_silent() {
        warn!(
            "REELFORGE_PUBLIC_AUDIO_BASE_URL is not set; remote renders will have no voiceover"
        );
    }

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let job_store = Arc::new(InMemoryJobStore::new());
    let client = build_client()?;

    let wiring = wire_assembly(&config, &client, time_provider.clone())?;
    let adapters = PipelineAdapters {
        script: Arc::new(OpenAiScriptGenerator::new(
            client.clone(),
            config.keys.openai.clone(),
        )),
        voice: Arc::new(ElevenLabsVoiceSynthesizer::new(
            client.clone(),
            config.keys.elevenlabs.clone(),
        )),
        footage: wiring.footage,
        assembler: wiring.assembler,
    };

    let orchestrator = Orchestrator::new(
        job_store.clone(),
        wiring.artifacts.clone(),
        adapters,
        wiring.media_probe,
        time_provider.clone(),
    )?;

    let service = Arc::new(JobService::new(
        job_store,
        wiring.artifacts,
        Arc::new(orchestrator),
        id_provider,
        time_provider.clone(),
    ));

    // 4. Start JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc.clone(), service);
    let (rpc_addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 5. Start retention sweep
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let retention = Arc::new(FsArtifactRetention::new(
        config.artifact_dir.clone(),
        time_provider,
    ));
    let scheduler = RetentionScheduler::new(retention, config.retention.clone());
    let retention_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!(rpc_addr = %rpc_addr, "System ready. Waiting for jobs...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown; in-flight jobs are abandoned with the process
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(Duration::from_secs(5), retention_handle).await;
    telemetry::shutdown();

    info!("Shutdown complete.");

    Ok(())
}
