// OpenAI chat-completions ScriptGenerator
use async_trait::async_trait;
use reelforge_core::catalog::{target_seconds, target_word_count};
use reelforge_core::domain::TargetDuration;
use reelforge_core::error::{AppError, Result};
use reelforge_core::port::ScriptGenerator;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{ensure_success, parse_json, transport};

const PROVIDER: &str = "OpenAI";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You write voiceover scripts for short vertical videos. \
Output only the words to be spoken.";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiScriptGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiScriptGenerator {
    pub fn new(client: Client, api_key: SecretString) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// User prompt sized to the duration bucket
    pub fn build_prompt(topic: &str, duration: TargetDuration) -> String {
        format!(
            "Write a {}-second video script of about {} words about: {}.\n\
             Open with a strong hook in the first sentence. \
             Use plain spoken sentences with no emojis or hashtags. \
             Do not include scene directions, speaker labels or a title.",
            target_seconds(duration),
            target_word_count(duration),
            topic
        )
    }

    fn request_body(&self, topic: &str, duration: TargetDuration) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::build_prompt(topic, duration) },
            ],
            "temperature": 0.7,
        })
    }
}

/// First non-empty completion, trimmed
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = parse_json(PROVIDER, body)?;
    response
        .choices
        .into_iter()
        .filter_map(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
        .ok_or_else(|| AppError::provider(PROVIDER, "completion contained no script text"))
}

#[async_trait]
impl ScriptGenerator for OpenAiScriptGenerator {
    async fn generate(&self, topic: &str, duration: TargetDuration) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %self.model, duration = %duration.as_str(), "Requesting script");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.request_body(topic, duration))
            .send()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        let body = ensure_success(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| transport(PROVIDER, e))?;

        parse_completion(&body)
    }
}
