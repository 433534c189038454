// Shared HTTP plumbing for provider adapters
use reelforge_core::error::{AppError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Connect timeout for every provider
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request timeout; voice synthesis of a long script is the slowest call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Provider error bodies are truncated before they reach job messages and logs
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Client shared by all adapters
pub fn build_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}... (truncated)", head)
    } else {
        trimmed.to_string()
    }
}

/// Request never produced a response (DNS, connect, timeout, decode)
pub(crate) fn transport(provider: &str, err: reqwest::Error) -> AppError {
    AppError::Transport(format!("{}: {}", provider, err))
}

/// Decode a success body; a body that is not the expected shape is the provider's fault
pub(crate) fn parse_json<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        AppError::provider(
            provider,
            format!("unexpected response body ({}): {}", e, truncate_body(body)),
        )
    })
}

/// Pass success responses through; turn anything else into a provider error carrying the body
pub(crate) async fn ensure_success(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(provider = %provider, status = %status, "Provider returned non-success status");
    Err(AppError::provider(
        provider,
        format!("HTTP {}: {}", status.as_u16(), truncate_body(&body)),
    ))
}
