//! Handwritten-note transcription using a vision-capable model.

use crate::config::Prompts;
use crate::error::{LaereError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageUrlArgs,
};
use base64::Engine;
use tracing::{debug, instrument, warn};

/// Transcribes handwritten-note images into clean plain text.
pub struct NotesOcr {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    instruction: String,
}

impl NotesOcr {
    /// Create a notes transcriber for the given model.
    pub fn new(model: &str, prompts: &Prompts) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            instruction: prompts.notes.instruction.clone(),
        }
    }

    /// Transcribe a set of note images into one combined text block.
    ///
    /// Each image is processed independently; a failed image contributes a
    /// labeled error block instead of aborting the rest.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub async fn transcribe_images(&self, images: &[(String, Vec<u8>)]) -> String {
        if images.is_empty() {
            return String::new();
        }

        let mut chunks: Vec<String> = Vec::with_capacity(images.len());

        for (name, bytes) in images {
            let chunk = match self.transcribe_one(name, bytes).await {
                Ok(text) => format!("=== Notes from {} ===\n{}", name, text),
                Err(e) => {
                    warn!("Note transcription failed for {}: {}", name, e);
                    format!("=== Notes from {} ===\n[Error reading this image: {}]", name, e)
                }
            };
            chunks.push(chunk);
        }

        chunks.join("\n\n").trim().to_string()
    }

    async fn transcribe_one(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let data_url = image_data_url(name, bytes);
        debug!("Transcribing notes from {}", name);

        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(self.instruction.clone())
                .build()
                .map_err(|e| LaereError::Extraction(e.to_string()))?
                .into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(
                    ImageUrlArgs::default()
                        .url(data_url)
                        .build()
                        .map_err(|e| LaereError::Extraction(e.to_string()))?,
                )
                .build()
                .map_err(|e| LaereError::Extraction(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(parts)
                .build()
                .map_err(|e| LaereError::Extraction(e.to_string()))?
                .into()])
            .temperature(0.1)
            .build()
            .map_err(|e| LaereError::Extraction(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LaereError::OpenAI(format!("Note transcription failed: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LaereError::Extraction(format!(
                "No text recognized in {}",
                name
            )));
        }

        Ok(text)
    }
}

/// Convert image bytes to a `data:` URL for vision requests.
fn image_data_url(filename: &str, bytes: &[u8]) -> String {
    let mime = match std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    };

    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, b64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_data_url() {
        let url = image_data_url("page.jpg", &[1, 2, 3]);
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let url = image_data_url("scan", &[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
