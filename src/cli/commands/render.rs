//! Render command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::render::RenderClient;
use std::path::Path;

/// Run the render command.
pub async fn run_render(
    script: &Path,
    avatar: Option<String>,
    voice: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    let script_text = std::fs::read_to_string(script)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", script.display(), e))?;
    let script_text = script_text.trim();
    if script_text.is_empty() {
        anyhow::bail!("Script file {} is empty", script.display());
    }

    let avatar_id = avatar.unwrap_or_else(|| settings.video.avatar_id.clone());
    let voice_id = voice.unwrap_or_else(|| settings.video.voice_id.clone());
    if avatar_id.is_empty() || voice_id.is_empty() {
        anyhow::bail!(
            "No avatar or voice configured. Set video.avatar_id and video.voice_id in the \
             config file, or pass --avatar and --voice."
        );
    }

    let client = RenderClient::new(&settings.video)?;

    Output::header("Rendering avatar video");
    Output::kv("Script", &script.display().to_string());
    Output::kv("Avatar", &avatar_id);
    Output::kv("Voice", &voice_id);

    let job_id = client
        .submit(script_text, &avatar_id, &voice_id, &settings.video.background_color)
        .await?;
    Output::info(&format!("Submitted render job {}", job_id));

    let spinner = Output::spinner("Waiting for render to complete...");
    let url = client.wait_for_completion(&job_id).await?;
    spinner.finish_and_clear();

    Output::success("Render complete.");
    Output::kv("Video URL", &url);
    Ok(())
}
