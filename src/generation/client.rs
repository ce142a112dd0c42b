//! Structured generation client.
//!
//! Wraps a single "ask the model for JSON" operation. Transport errors,
//! missing credentials, and invalid JSON all surface as errors; a reply that
//! parses but is empty is the parsers' problem, not the client's. No retries
//! are performed here.

use crate::config::GenerationSettings;
use crate::error::{LaereError, Result};
use crate::openai::create_client_with_key;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Marker appended to truncated source excerpts.
pub const EXCERPT_TRUNCATION_MARKER: &str = "... [truncated]";

/// A generator that returns a JSON mapping for a system/user prompt pair.
///
/// The seam exists so the orchestrator can be exercised without network
/// access.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Request a JSON-only completion and parse it.
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value>;
}

/// OpenAI-backed structured generator.
pub struct OpenAiGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    /// Create a generator from settings, with an optional per-request API
    /// key that applies to this instance only.
    pub fn new(settings: &GenerationSettings, api_key: Option<&str>) -> Self {
        Self {
            client: create_client_with_key(api_key),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }
}

#[async_trait]
impl StructuredGenerator for OpenAiGenerator {
    #[instrument(skip(self, system_prompt, user_prompt))]
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| LaereError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| LaereError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| LaereError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LaereError::OpenAI(format!("Structured generation failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| LaereError::Generation("Empty response from model".to_string()))?;

        debug!(
            "Model reply: {}",
            content.chars().take(500).collect::<String>()
        );

        serde_json::from_str(content).map_err(|e| {
            LaereError::Generation(format!(
                "Model reply was not valid JSON: {}. Reply started with: {}",
                e,
                content.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// Shorten source text to keep prompts within a bounded character budget.
///
/// Truncation keeps a legible prefix and appends a visible marker so the
/// model knows material was cut.
pub fn format_source_excerpt(full_text: &str, limit: usize) -> String {
    let trimmed = full_text.trim();
    if trimmed.is_empty() {
        return "[No source text supplied; rely on general instructional design best practices.]"
            .to_string();
    }

    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }

    let prefix: String = trimmed.chars().take(limit).collect();
    format!("{} {}", prefix.trim_end(), EXCERPT_TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_passthrough_when_short() {
        assert_eq!(format_source_excerpt("short text", 100), "short text");
    }

    #[test]
    fn test_excerpt_truncates_with_marker() {
        let long = "a".repeat(500);
        let excerpt = format_source_excerpt(&long, 100);
        assert!(excerpt.ends_with(EXCERPT_TRUNCATION_MARKER));
        assert!(excerpt.chars().count() < 500);
        assert!(excerpt.starts_with("aaaa"));
    }

    #[test]
    fn test_excerpt_empty_input() {
        let excerpt = format_source_excerpt("   ", 100);
        assert!(excerpt.contains("No source text supplied"));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        // Multi-byte characters must not be split.
        let long = "æøå".repeat(200);
        let excerpt = format_source_excerpt(&long, 50);
        assert!(excerpt.ends_with(EXCERPT_TRUNCATION_MARKER));
    }
}
