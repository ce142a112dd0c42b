//! Batch command implementation.

use crate::batch::{parse_rows, BatchProcessor};
use crate::cli::Output;
use crate::config::Settings;
use crate::generation::PackageGenerator;
use crate::speech::SpeechService;
use std::path::Path;

/// Run the batch command.
pub async fn run_batch(
    input: &Path,
    output: &Path,
    narrate: bool,
    settings: Settings,
) -> anyhow::Result<()> {
    Output::header(&format!("Batch processing {}", input.display()));

    let csv_bytes = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?;
    let rows = parse_rows(&csv_bytes)?;
    Output::info(&format!("Validated {} row(s)", rows.len()));

    let generator = PackageGenerator::new(&settings, None)?;
    let speech = narrate.then(|| SpeechService::new(&settings.speech));
    let processor = BatchProcessor::new(generator, speech);

    let bar = Output::progress_bar(100, "Starting...");
    let archive = processor
        .process_batch(&rows, &{
            let bar = bar.clone();
            move |fraction: f64, label: &str| {
                bar.set_position((fraction * 100.0) as u64);
                bar.set_message(label.to_string());
            }
        })
        .await?;
    bar.finish_and_clear();

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &archive)?;

    Output::success(&format!(
        "Wrote {} ({} bytes, {} classes)",
        output.display(),
        archive.len(),
        rows.len()
    ));
    Ok(())
}
