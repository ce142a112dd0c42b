//! OpenAI client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with configured timeout.
///
/// Uses a 5-minute timeout by default to prevent hung API calls. The API key
/// is resolved from the `OPENAI_API_KEY` environment variable.
pub fn create_client() -> Client<OpenAIConfig> {
    create_client_with_key(None)
}

/// Create an OpenAI client with an optional per-request API key override.
///
/// When a key is supplied it applies to this client only; shared
/// configuration is never mutated, so an override cannot leak into
/// subsequent requests.
pub fn create_client_with_key(api_key: Option<&str>) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    let config = match api_key {
        Some(key) => OpenAIConfig::new().with_api_key(key),
        None => OpenAIConfig::default(),
    };

    Client::with_config(config).with_http_client(http_client)
}

/// Check if the OpenAI API key is configured in the environment.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok()
}
