//! Configuration settings for Laere.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub generation: GenerationSettings,
    pub speech: SpeechSettings,
    pub notes: NotesSettings,
    pub video: VideoRenderSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Default directory for generated output.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "./laere-output".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Settings for structured artifact generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat model used for all four artifacts.
    pub model: String,
    /// Character budget for source excerpts embedded in prompts.
    pub excerpt_limit: usize,
    /// Sampling temperature for generation requests.
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            excerpt_limit: 6000,
            temperature: 0.4,
        }
    }
}

/// Speech service settings (transcription and narration synthesis).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Model for audio transcription (STT).
    pub transcribe_model: String,
    /// Model for narration synthesis (TTS).
    pub tts_model: String,
    /// TTS voice name.
    pub voice: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            transcribe_model: "gpt-4o-transcribe".to_string(),
            tts_model: "gpt-4o-mini-tts".to_string(),
            voice: "alloy".to_string(),
        }
    }
}

/// Handwritten-notes OCR settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesSettings {
    /// Vision-capable model used for note transcription.
    pub model: String,
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Third-party avatar video rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRenderSettings {
    /// Base URL of the render API.
    pub api_base: String,
    /// API key for the render service.
    pub api_key: Option<String>,
    /// Default avatar id.
    pub avatar_id: String,
    /// Default voice id.
    pub voice_id: String,
    /// Background color for rendered videos.
    pub background_color: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Seconds between status polls.
    pub poll_interval_seconds: u64,
    /// Maximum seconds to wait for a render job before giving up.
    pub timeout_seconds: u64,
}

impl Default for VideoRenderSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.heygen.com".to_string(),
            api_key: None,
            avatar_id: String::new(),
            voice_id: String::new(),
            background_color: "#FFFFFF".to_string(),
            width: 1280,
            height: 720,
            poll_interval_seconds: 5,
            timeout_seconds: 600,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LaereError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("laere")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.generation.excerpt_limit, 6000);
        assert_eq!(settings.video.poll_interval_seconds, 5);
        assert_eq!(settings.video.timeout_seconds, 600);
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.generation.model = "gpt-4o-mini".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.generation.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[generation]
model = "gpt-4o"
"#;
        let settings: Settings = toml::from_str(partial).unwrap();
        assert_eq!(settings.generation.model, "gpt-4o");
        assert_eq!(settings.speech.voice, "alloy");
    }
}
