//! Daemon configuration from environment variables

use reelforge_core::error::{AppError, Result};
use reelforge_core::port::{AssemblyStrategy, RetentionConfig, SelectionPolicy};
use reelforge_api_rpc::RpcServerConfig;
use reelforge_infra_http::ShotstackEnv;
use secrecy::SecretString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ARTIFACT_DIR: &str = "~/.reelforge/artifacts";
const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";
const DEFAULT_FFPROBE_BIN: &str = "ffprobe";

/// Provider credentials; never printed
pub struct ProviderKeys {
    pub openai: SecretString,
    pub elevenlabs: SecretString,
    pub pexels: SecretString,
    /// Remote strategy only
    pub shotstack: Option<SecretString>,
}

impl fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderKeys")
            .field("openai", &"[REDACTED]")
            .field("elevenlabs", &"[REDACTED]")
            .field("pexels", &"[REDACTED]")
            .field("shotstack", &self.shotstack.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub artifact_dir: PathBuf,
    pub assembly: AssemblyStrategy,
    pub footage_selection: SelectionPolicy,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    pub shotstack_env: ShotstackEnv,
    pub public_audio_base_url: Option<String>,
    pub retention: RetentionConfig,
    pub keys: ProviderKeys,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = RpcServerConfig::default();
        let rpc = RpcServerConfig {
            host: var("REELFORGE_RPC_HOST").unwrap_or(defaults.host),
            port: parse_or(&var, "REELFORGE_RPC_PORT", defaults.port)?,
        };

        let artifact_dir = var("REELFORGE_ARTIFACT_DIR")
            .map(|d| shellexpand::tilde(&d).into_owned())
            .unwrap_or_else(|| shellexpand::tilde(DEFAULT_ARTIFACT_DIR).into_owned())
            .into();

        let assembly = match var("REELFORGE_ASSEMBLY") {
            Some(v) => v.parse::<AssemblyStrategy>().map_err(AppError::Config)?,
            None => AssemblyStrategy::LocalMux,
        };
        let footage_selection = match var("REELFORGE_FOOTAGE_SELECTION") {
            Some(v) => v.parse::<SelectionPolicy>().map_err(AppError::Config)?,
            None => SelectionPolicy::default(),
        };
        let shotstack_env = match var("REELFORGE_SHOTSTACK_ENV") {
            Some(v) => v.parse::<ShotstackEnv>().map_err(AppError::Config)?,
            None => ShotstackEnv::default(),
        };

        let retention_defaults = RetentionConfig::default();
        let retention = RetentionConfig {
            max_age: Duration::from_secs(parse_or(
                &var,
                "REELFORGE_RETENTION_MAX_AGE_SECS",
                retention_defaults.max_age.as_secs(),
            )?),
            interval: Duration::from_secs(parse_or(
                &var,
                "REELFORGE_RETENTION_INTERVAL_SECS",
                retention_defaults.interval.as_secs(),
            )?),
        };
        if retention.interval.is_zero() {
            return Err(AppError::Config(
                "REELFORGE_RETENTION_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        let public_audio_base_url = var("REELFORGE_PUBLIC_AUDIO_BASE_URL");
        if let Some(url) = &public_audio_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!(
                    "REELFORGE_PUBLIC_AUDIO_BASE_URL must be an http(s) URL: {}",
                    url
                )));
            }
        }

        let shotstack = var("SHOTSTACK_API_KEY").map(SecretString::from);
        if assembly == AssemblyStrategy::RemoteRender && shotstack.is_none() {
            return Err(missing("SHOTSTACK_API_KEY"));
        }

        let keys = ProviderKeys {
            openai: required(&var, "OPENAI_API_KEY")?,
            elevenlabs: required(&var, "ELEVENLABS_API_KEY")?,
            pexels: required(&var, "PEXELS_API_KEY")?,
            shotstack,
        };

        Ok(Self {
            rpc,
            artifact_dir,
            assembly,
            footage_selection,
            ffmpeg_bin: var("REELFORGE_FFMPEG_BIN").unwrap_or_else(|| DEFAULT_FFMPEG_BIN.to_string()),
            ffprobe_bin: var("REELFORGE_FFPROBE_BIN")
                .unwrap_or_else(|| DEFAULT_FFPROBE_BIN.to_string()),
            shotstack_env,
            public_audio_base_url,
            retention,
            keys,
        })
    }
}

impl DaemonConfig {
    /// Remote renders carry no voiceover unless the operator publishes each job's
    /// audio at `{REELFORGE_PUBLIC_AUDIO_BASE_URL}/jobs/{id}/audio`; the daemon itself
    /// only serves audio over JSON-RPC
    pub fn remote_render_is_silent(&self) -> bool {
        self.assembly == AssemblyStrategy::RemoteRender && self.public_audio_base_url.is_none()
    }
}

fn missing(key: &str) -> AppError {
    AppError::Config(format!("{} is not set", key))
}

fn required<F>(var: &F, key: &str) -> Result<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    var(key).map(SecretString::from).ok_or_else(|| missing(key))
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
