//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.output_dir" => settings.general.output_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "generation.model" => settings.generation.model = value.to_string(),
        "generation.excerpt_limit" => settings.generation.excerpt_limit = value.parse()?,
        "generation.temperature" => settings.generation.temperature = value.parse()?,
        "speech.transcribe_model" => settings.speech.transcribe_model = value.to_string(),
        "speech.tts_model" => settings.speech.tts_model = value.to_string(),
        "speech.voice" => settings.speech.voice = value.to_string(),
        "notes.model" => settings.notes.model = value.to_string(),
        "video.api_base" => settings.video.api_base = value.to_string(),
        "video.api_key" => settings.video.api_key = Some(value.to_string()),
        "video.avatar_id" => settings.video.avatar_id = value.to_string(),
        "video.voice_id" => settings.video.voice_id = value.to_string(),
        "video.background_color" => settings.video.background_color = value.to_string(),
        "video.width" => settings.video.width = value.parse()?,
        "video.height" => settings.video.height = value.parse()?,
        "video.poll_interval_seconds" => settings.video.poll_interval_seconds = value.parse()?,
        "video.timeout_seconds" => settings.video.timeout_seconds = value.parse()?,
        "prompts.custom_dir" => settings.prompts.custom_dir = Some(value.to_string()),
        other => anyhow::bail!("Unknown configuration key: {}", other),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_known_keys() {
        let mut settings = Settings::default();
        set_value(&mut settings, "generation.model", "gpt-4o").unwrap();
        set_value(&mut settings, "video.width", "1920").unwrap();
        assert_eq!(settings.generation.model, "gpt-4o");
        assert_eq!(settings.video.width, 1920);
    }

    #[test]
    fn test_set_value_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "nope.nothing", "x").is_err());
    }

    #[test]
    fn test_set_value_rejects_bad_number() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "video.width", "wide").is_err());
    }
}
