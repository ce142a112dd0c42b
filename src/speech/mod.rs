//! Speech services: audio transcription (STT) and narration synthesis (TTS).
//!
//! Both directions fail per item: a file that cannot be transcribed yields a
//! labeled error string and a segment that cannot be synthesized yields an
//! error artifact, so one bad item never aborts the rest.

use crate::artifact::VideoScript;
use crate::config::SpeechSettings;
use crate::error::{LaereError, Result};
use crate::openai::create_client;
use async_openai::types::{
    AudioInput, CreateSpeechRequestArgs, CreateTranscriptionRequestArgs, SpeechModel, Voice,
};
use tracing::{debug, info, instrument, warn};

/// OpenAI-backed speech service.
pub struct SpeechService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    transcribe_model: String,
    tts_model: String,
    voice: Voice,
}

impl SpeechService {
    /// Create a speech service from settings.
    pub fn new(settings: &SpeechSettings) -> Self {
        Self {
            client: create_client(),
            transcribe_model: settings.transcribe_model.clone(),
            tts_model: settings.tts_model.clone(),
            voice: voice_from_name(&settings.voice),
        }
    }

    /// Transcribe one audio file.
    #[instrument(skip(self, audio), fields(filename = %filename, bytes = audio.len()))]
    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String> {
        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(filename.to_string(), audio))
            .model(&self.transcribe_model)
            .build()
            .map_err(|e| LaereError::Speech(e.to_string()))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| LaereError::OpenAI(format!("Transcription failed: {}", e)))?;

        debug!("Transcribed {} characters", response.text.len());
        Ok(response.text)
    }

    /// Transcribe a set of audio files into one combined transcript.
    ///
    /// Each file is labeled with its name; failures contribute a labeled
    /// error line instead of aborting.
    pub async fn transcribe_batch(&self, files: &[(String, Vec<u8>)]) -> String {
        let mut transcripts: Vec<String> = Vec::with_capacity(files.len());

        for (name, bytes) in files {
            let chunk = match self.transcribe(bytes.clone(), name).await {
                Ok(text) if !text.trim().is_empty() => {
                    format!("--- Transcript from {} ---\n{}", name, text.trim())
                }
                Ok(_) => format!("[No speech detected in {}]", name),
                Err(e) => {
                    warn!("Transcription failed for {}: {}", name, e);
                    format!("[Transcription failed for {}: {}]", name, e)
                }
            };
            transcripts.push(chunk);
        }

        transcripts.join("\n\n").trim().to_string()
    }

    /// Synthesize speech audio for a text.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = CreateSpeechRequestArgs::default()
            .model(SpeechModel::Other(self.tts_model.clone()))
            .voice(self.voice.clone())
            .input(text)
            .build()
            .map_err(|e| LaereError::Speech(e.to_string()))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| LaereError::OpenAI(format!("Speech synthesis failed: {}", e)))?;

        Ok(response.bytes.to_vec())
    }

    /// Synthesize narration audio for each segment of a video script.
    ///
    /// Returns `(filename, bytes)` pairs. Segments with empty narration are
    /// skipped; a failed segment yields an error artifact in its place.
    #[instrument(skip(self, script), fields(segments = script.segments.len()))]
    pub async fn synthesize_narration(&self, script: &VideoScript) -> Vec<(String, Vec<u8>)> {
        let mut payloads: Vec<(String, Vec<u8>)> = Vec::new();

        for (idx, segment) in script.segments.iter().enumerate() {
            let number = idx + 1;
            let narration = segment.narration.trim();
            if narration.is_empty() {
                continue;
            }

            match self.synthesize(narration).await {
                Ok(bytes) => {
                    let filename =
                        format!("segment_{:02}_{}.mp3", number, audio_slug(&segment.title));
                    info!("Synthesized narration for segment {}", number);
                    payloads.push((filename, bytes));
                }
                Err(e) => {
                    warn!("TTS failed for segment '{}': {}", segment.title, e);
                    let note = format!("Error generating TTS for segment {}: {}", number, e);
                    payloads.push((
                        format!("segment_{:02}_ERROR.txt", number),
                        note.into_bytes(),
                    ));
                }
            }
        }

        payloads
    }
}

/// Map a configured voice name to the API voice, defaulting to alloy.
fn voice_from_name(name: &str) -> Voice {
    match name.to_ascii_lowercase().as_str() {
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => Voice::Alloy,
    }
}

/// Reduce a segment title to a filesystem-safe lowercase fragment.
fn audio_slug(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "segment".to_string()
    } else {
        trimmed.chars().take(40).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_slug() {
        assert_eq!(audio_slug("Scene 1 - Overview"), "scene_1___overview");
        assert_eq!(audio_slug("***"), "segment");
    }

    #[test]
    fn test_voice_mapping_defaults_to_alloy() {
        assert!(matches!(voice_from_name("nova"), Voice::Nova));
        assert!(matches!(voice_from_name("unknown"), Voice::Alloy));
    }
}
