//! Generate command implementation.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::export::package_to_markdown;
use crate::generation::PackageGenerator;
use crate::ingest::{self, extract_documents, NotesOcr};
use crate::speech::SpeechService;
use std::path::{Path, PathBuf};

/// Run the generate command.
#[allow(clippy::too_many_arguments)]
pub async fn run_generate(
    title: &str,
    class_type: &str,
    files: &[PathBuf],
    audio: &[PathBuf],
    notes: &[PathBuf],
    output: &Path,
    narrate: bool,
    api_key: Option<String>,
    settings: Settings,
) -> anyhow::Result<()> {
    Output::header(&format!("Generating training package: {}", title));

    if api_key.is_none() && !crate::openai::is_api_key_configured() {
        Output::warning(
            "OPENAI_API_KEY is not set; generation will fall back to template content.",
        );
    }

    // Gather sources in their fixed aggregation order.
    let document_text = if files.is_empty() {
        String::new()
    } else {
        let spinner = Output::spinner(&format!("Reading {} document(s)...", files.len()));
        let loaded = read_files(files)?;
        let text = extract_documents(&loaded);
        spinner.finish_and_clear();
        text
    };

    let transcript_text = if audio.is_empty() {
        String::new()
    } else {
        let spinner = Output::spinner(&format!("Transcribing {} recording(s)...", audio.len()));
        let speech = SpeechService::new(&settings.speech);
        let loaded = read_files(audio)?;
        let text = speech.transcribe_batch(&loaded).await;
        spinner.finish_and_clear();
        text
    };

    let notes_text = if notes.is_empty() {
        String::new()
    } else {
        let spinner = Output::spinner(&format!("Reading {} note image(s)...", notes.len()));
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let ocr = NotesOcr::new(&settings.notes.model, &prompts);
        let loaded = read_files(notes)?;
        let text = ocr.transcribe_images(&loaded).await;
        spinner.finish_and_clear();
        text
    };

    let source_text = ingest::aggregate(&document_text, &transcript_text, &notes_text);
    Output::info(&format!("Aggregated {} characters of source text", source_text.len()));

    // Generate all four artifacts.
    let generator = PackageGenerator::new(&settings, api_key.as_deref())?;
    let spinner = Output::spinner("Generating artifacts...");
    let outcome = generator.build_package(&source_text, title, class_type).await;
    spinner.finish_and_clear();

    if outcome.is_degraded() {
        for kind in &outcome.degraded {
            Output::warning(&format!(
                "Generation failed for the {}; wrote fallback content instead",
                kind
            ));
        }
    }

    // Export markdown.
    std::fs::create_dir_all(output)?;
    Output::header("Generated files");
    for (filename, markdown) in package_to_markdown(&outcome.package) {
        let path = output.join(&filename);
        std::fs::write(&path, markdown)?;
        let degraded = outcome
            .degraded
            .iter()
            .any(|kind| kind.filename() == filename);
        Output::artifact(&filename, &path.display().to_string(), degraded);
    }

    // Optional narration audio.
    if narrate {
        let speech = SpeechService::new(&settings.speech);
        let spinner = Output::spinner("Synthesizing narration audio...");
        let payloads = speech
            .synthesize_narration(&outcome.package.video_script)
            .await;
        spinner.finish_and_clear();

        let audio_dir = output.join("audio");
        std::fs::create_dir_all(&audio_dir)?;
        for (filename, bytes) in payloads {
            let path = audio_dir.join(&filename);
            std::fs::write(&path, bytes)?;
            Output::list_item(&path.display().to_string());
        }
    }

    Output::success("Training package complete.");
    Ok(())
}

/// Read a set of paths into `(filename, bytes)` pairs.
fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        loaded.push((name, bytes));
    }
    Ok(loaded)
}
