// ElevenLabs text-to-speech VoiceSynthesizer
use async_trait::async_trait;
use reelforge_core::catalog::resolve_voice;
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::VoiceSynthesizer;
use reqwest::header::ACCEPT;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::client::{ensure_success, transport};

const PROVIDER: &str = "ElevenLabs";
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";
const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

pub struct ElevenLabsVoiceSynthesizer {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model_id: String,
    settings: VoiceSettings,
}

impl ElevenLabsVoiceSynthesizer {
    pub fn new(client: Client, api_key: SecretString) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            settings: VoiceSettings::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Endpoint for a catalog voice key; unknown keys use the default voice
    pub fn speech_url(&self, voice: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, resolve_voice(voice))
    }
}

#[async_trait]
impl VoiceSynthesizer for ElevenLabsVoiceSynthesizer {
    async fn synthesize(&self, script: &str, voice: &str) -> Result<Vec<u8>> {
        let url = self.speech_url(voice);
        debug!(voice = %voice, chars = script.chars().count(), "Requesting speech");

        let request = SpeechRequest {
            text: script,
            model_id: &self.model_id,
            voice_settings: &self.settings,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header(ACCEPT, "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        let bytes = ensure_success(PROVIDER, response)
            .await?
            .bytes()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        if bytes.is_empty() {
            return Err(AppError::provider(PROVIDER, "empty audio response"));
        }
        Ok(bytes.to_vec())
    }
}
