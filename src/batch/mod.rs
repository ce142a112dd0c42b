//! Batch processing of tabular course descriptions.
//!
//! A batch is a CSV of course rows. Required columns are validated before
//! any row is processed; after that, each row is processed independently and
//! a failing row contributes an error note to the archive instead of
//! stopping the batch. The output is a single ZIP with one folder per row.

use crate::error::{LaereError, Result};
use crate::export::{outline_to_markdown, video_script_to_markdown};
use crate::generation::PackageGenerator;
use crate::speech::SpeechService;
use regex::Regex;
use std::io::{Cursor, Write};
use std::sync::OnceLock;
use tracing::{info, instrument, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Columns every batch CSV must provide.
pub const REQUIRED_HEADERS: [&str; 4] = ["#", "video_file", "est_duration", "brief_description"];

/// Class type used for all batch-generated artifacts.
const BATCH_CLASS_TYPE: &str = "Video Walkthrough";

/// Maximum slug length in folder names.
const SLUG_MAX_LEN: usize = 30;

/// One row of a batch job.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// Job index/number from the `#` column.
    pub number: String,
    /// Reference video filename.
    pub video_file: String,
    /// Estimated duration, kept as the free-form string the sheet provides.
    pub est_duration: String,
    /// Free-text course description. May be empty.
    pub description: String,
}

impl BatchRow {
    /// Deterministic archive folder for this row.
    pub fn folder_name(&self) -> String {
        format!("class_{}_{}", self.number.trim(), slugify(&self.description))
    }

    /// Course title derived from the row.
    pub fn course_title(&self) -> String {
        let description = self.description.trim();
        if description.is_empty() {
            format!("Class {}", self.number.trim())
        } else {
            format!("Class {}: {}", self.number.trim(), description)
        }
    }

    /// Synthetic source text fed to the generators.
    pub fn context_text(&self, duration_minutes: u32) -> String {
        format!(
            "Video File Reference: {}\nEstimated Duration: {} minutes\nDescription/Context: {}",
            self.video_file.trim(),
            duration_minutes,
            self.description.trim(),
        )
    }
}

/// Parse a free-form duration string into whole minutes, rounding up.
///
/// Accepts a bare number (minutes), a number with an h/m/s unit, or an
/// `mm:ss` form. Anything else is a validation error.
pub fn parse_duration_minutes(value: &str) -> Result<u32> {
    let captures = duration_re().captures(value).ok_or_else(|| {
        LaereError::Validation(format!("Unparsable est_duration '{}'", value.trim()))
    })?;

    let amount: u32 = captures[1].parse().map_err(|_| {
        LaereError::Validation(format!("Unparsable est_duration '{}'", value.trim()))
    })?;

    if let Some(seconds) = captures.get(2) {
        let seconds: u32 = seconds.as_str().parse().unwrap_or(0);
        return Ok(amount + u32::from(seconds > 0));
    }

    let unit = captures
        .get(3)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    match unit.chars().next() {
        Some('h') => Ok(amount * 60),
        Some('s') => Ok(amount.div_ceil(60)),
        _ => Ok(amount),
    }
}

fn slug_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").unwrap())
}

fn slug_collapse_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").unwrap())
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d+)(?::([0-5]?\d))?\s*(h|hrs?|hours?|m|mins?|minutes?|s|secs?|seconds?)?\s*$")
            .unwrap()
    })
}

/// Normalize a description into a lowercase hyphenated slug, capped in
/// length. Empty input yields the `untitled` placeholder.
pub fn slugify(value: &str) -> String {
    let strip = slug_strip_re();
    let collapse = slug_collapse_re();

    let cleaned = strip.replace_all(value, "");
    let slug = collapse
        .replace_all(cleaned.trim(), "-")
        .to_lowercase()
        .trim_matches('-')
        .to_string();

    if slug.is_empty() {
        return "untitled".to_string();
    }

    slug.chars().take(SLUG_MAX_LEN).collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// Parse and validate batch rows from CSV bytes.
///
/// Fails fast with a validation error on missing columns, missing required
/// cells, or an empty table; no row is processed when validation fails.
pub fn parse_rows(csv_bytes: &[u8]) -> Result<Vec<BatchRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(LaereError::Validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let index_of = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let number_idx = index_of("#");
    let file_idx = index_of("video_file");
    let duration_idx = index_of("est_duration");
    let description_idx = index_of("brief_description");

    let mut rows: Vec<BatchRow> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

        let row = BatchRow {
            number: cell(number_idx),
            video_file: cell(file_idx),
            est_duration: cell(duration_idx),
            description: cell(description_idx),
        };

        // The description may be empty (a placeholder slug is used), but
        // the identifying fields must be present.
        for (field, value) in [
            ("#", &row.number),
            ("video_file", &row.video_file),
            ("est_duration", &row.est_duration),
        ] {
            if value.is_empty() {
                return Err(LaereError::Validation(format!(
                    "Row {} is missing required field '{}'",
                    line + 1,
                    field
                )));
            }
        }

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LaereError::Validation(
            "Batch table contains no rows".to_string(),
        ));
    }

    Ok(rows)
}

/// Processes batch rows into a ZIP archive of generated materials.
pub struct BatchProcessor {
    generator: PackageGenerator,
    speech: Option<SpeechService>,
}

impl BatchProcessor {
    /// Create a batch processor. Narration audio is synthesized per segment
    /// when a speech service is supplied.
    pub fn new(generator: PackageGenerator, speech: Option<SpeechService>) -> Self {
        Self { generator, speech }
    }

    /// Process every row and return the archive bytes.
    ///
    /// The progress callback is invoked with fractional completion and a
    /// short label; it reaches `1.0` exactly once, after the last row.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub async fn process_batch(
        &self,
        rows: &[BatchRow],
        progress: &(dyn Fn(f64, &str) + Send + Sync),
    ) -> Result<Vec<u8>> {
        if rows.is_empty() {
            return Err(LaereError::Validation(
                "Batch table contains no rows".to_string(),
            ));
        }

        let mut buffer = Cursor::new(Vec::new());
        let mut archive = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let total = rows.len();

        for (i, row) in rows.iter().enumerate() {
            let label = format!("Processing class {}: {}", row.number, preview(&row.description));
            progress(i as f64 / total as f64, &label);

            let folder = row.folder_name();
            match self.process_row(row).await {
                Ok(files) => {
                    for (name, bytes) in files {
                        archive
                            .start_file(format!("{}/{}", folder, name), options)
                            .map_err(|e| LaereError::Archive(e.to_string()))?;
                        archive.write_all(&bytes)?;
                    }
                }
                Err(e) => {
                    // One bad row must not stop the rest of the batch.
                    warn!("Row {} failed: {}", row.number, e);
                    archive
                        .start_file(format!("{}/error.txt", folder), options)
                        .map_err(|e| LaereError::Archive(e.to_string()))?;
                    archive.write_all(
                        format!("Processing failed for class {}: {}\n", row.number, e).as_bytes(),
                    )?;
                }
            }
        }

        archive
            .finish()
            .map_err(|e| LaereError::Archive(e.to_string()))?;
        progress(1.0, "Archive complete");

        info!("Batch complete: {} rows", total);
        Ok(buffer.into_inner())
    }

    /// Generate the materials for a single row.
    ///
    /// A malformed duration fails the row here, before any generation work,
    /// and is isolated by the caller.
    async fn process_row(&self, row: &BatchRow) -> Result<Vec<(String, Vec<u8>)>> {
        let duration_minutes = parse_duration_minutes(&row.est_duration)?;
        let context = row.context_text(duration_minutes);
        let title = row.course_title();

        let (outline, _) = self
            .generator
            .generate_outline(&context, &title, BATCH_CLASS_TYPE)
            .await;
        let (script, _) = self
            .generator
            .generate_video_script(&context, &title, BATCH_CLASS_TYPE)
            .await;

        let mut files: Vec<(String, Vec<u8>)> = vec![
            (
                "class_outline.md".to_string(),
                outline_to_markdown(&outline).into_bytes(),
            ),
            (
                "video_script.md".to_string(),
                video_script_to_markdown(&script).into_bytes(),
            ),
        ];

        if let Some(speech) = &self.speech {
            for (name, bytes) in speech.synthesize_narration(&script).await {
                files.push((format!("audio/{}", name), bytes));
            }
        }

        Ok(files)
    }
}

/// Short description preview for progress labels.
fn preview(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return "(no description)".to_string();
    }
    let short: String = trimmed.chars().take(30).collect();
    if short.len() < trimmed.len() {
        format!("{}...", short)
    } else {
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::generation::StructuredGenerator;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct StubGenerator;

    #[async_trait]
    impl StructuredGenerator for StubGenerator {
        async fn generate_structured(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<serde_json::Value> {
            Ok(json!({
                "title": "Stub",
                "sections": [{"title": "S", "objectives": ["o"]}],
                "segments": [{"title": "V", "narration": "n", "screen_directions": "d"}]
            }))
        }
    }

    fn processor() -> BatchProcessor {
        let generator = PackageGenerator::with_generator(
            Arc::new(StubGenerator),
            Prompts::default_templates(),
            6000,
        );
        BatchProcessor::new(generator, None)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to Widgets!"), "intro-to-widgets");
        assert_eq!(slugify("  Spaces   and-hyphens  "), "spaces-and-hyphens");
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("???"), "untitled");

        let long = slugify(&"very long description ".repeat(10));
        assert!(long.len() <= SLUG_MAX_LEN);
    }

    #[test]
    fn test_parse_rows_happy_path() {
        let csv = b"#,video_file,est_duration,brief_description\n1,a.mp4,5m,Setting up\n2,b.mp4,10m,Advanced usage\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, "1");
        assert_eq!(rows[1].description, "Advanced usage");
    }

    #[test]
    fn test_parse_rows_missing_column_fails_fast() {
        let csv = b"#,video_file,brief_description\n1,a.mp4,Setting up\n";
        let err = parse_rows(csv).unwrap_err();
        assert!(matches!(err, LaereError::Validation(_)));
        assert!(err.to_string().contains("est_duration"));
    }

    #[test]
    fn test_parse_rows_missing_cell_fails_fast() {
        let csv = b"#,video_file,est_duration,brief_description\n1,a.mp4,5m,First\n2,b.mp4,,Second\n3,c.mp4,5m,Third\n";
        let err = parse_rows(csv).unwrap_err();
        assert!(matches!(err, LaereError::Validation(_)));
        assert!(err.to_string().contains("est_duration"));
    }

    #[test]
    fn test_parse_rows_empty_description_is_allowed() {
        let csv = b"#,video_file,est_duration,brief_description\n1,a.mp4,5m,\n";
        let rows = parse_rows(csv).unwrap();
        assert_eq!(rows[0].folder_name(), "class_1_untitled");
    }

    #[test]
    fn test_folder_name_is_deterministic() {
        let row = BatchRow {
            number: "7".to_string(),
            video_file: "x.mp4".to_string(),
            est_duration: "5m".to_string(),
            description: "Creating a New Project".to_string(),
        };
        assert_eq!(row.folder_name(), "class_7_creating-a-new-project");
        assert_eq!(row.folder_name(), row.folder_name());
    }

    #[tokio::test]
    async fn test_process_batch_creates_folder_per_row() {
        let rows = vec![
            BatchRow {
                number: "1".to_string(),
                video_file: "a.mp4".to_string(),
                est_duration: "5m".to_string(),
                description: "First class".to_string(),
            },
            BatchRow {
                number: "2".to_string(),
                video_file: "b.mp4".to_string(),
                est_duration: "5m".to_string(),
                description: String::new(),
            },
            BatchRow {
                number: "3".to_string(),
                video_file: "c.mp4".to_string(),
                est_duration: "5m".to_string(),
                description: "Third class".to_string(),
            },
        ];

        let bytes = processor().process_batch(&rows, &|_: f64, _: &str| {}).await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        assert!(names.contains(&"class_1_first-class/class_outline.md".to_string()));
        assert!(names.contains(&"class_1_first-class/video_script.md".to_string()));
        // The empty description gets a placeholder slug but still a folder.
        assert!(names.contains(&"class_2_untitled/class_outline.md".to_string()));
        assert!(names.contains(&"class_3_third-class/video_script.md".to_string()));
    }

    #[tokio::test]
    async fn test_progress_reaches_one_exactly_once() {
        let rows = vec![
            BatchRow {
                number: "1".to_string(),
                video_file: "a.mp4".to_string(),
                est_duration: "5m".to_string(),
                description: "Only class".to_string(),
            },
        ];

        let calls: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();
        processor()
            .process_batch(&rows, &move |fraction: f64, _label: &str| {
                recorded.lock().unwrap().push(fraction);
            })
            .await
            .unwrap();

        let fractions = calls.lock().unwrap();
        assert_eq!(
            fractions.iter().filter(|f| (**f - 1.0).abs() < f64::EPSILON).count(),
            1
        );
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration_minutes("5").unwrap(), 5);
        assert_eq!(parse_duration_minutes("5m").unwrap(), 5);
        assert_eq!(parse_duration_minutes("10 min").unwrap(), 10);
        assert_eq!(parse_duration_minutes("2h").unwrap(), 120);
        assert_eq!(parse_duration_minutes("90s").unwrap(), 2);
        assert_eq!(parse_duration_minutes("1:30").unwrap(), 2);
        assert_eq!(parse_duration_minutes("3:00").unwrap(), 3);

        assert!(parse_duration_minutes("soon").is_err());
        assert!(parse_duration_minutes("").is_err());
    }

    #[tokio::test]
    async fn test_bad_row_writes_error_note_and_batch_continues() {
        let rows = vec![
            BatchRow {
                number: "1".to_string(),
                video_file: "a.mp4".to_string(),
                est_duration: "5m".to_string(),
                description: "First class".to_string(),
            },
            BatchRow {
                number: "2".to_string(),
                video_file: "b.mp4".to_string(),
                est_duration: "about an hour".to_string(),
                description: "Broken class".to_string(),
            },
            BatchRow {
                number: "3".to_string(),
                video_file: "c.mp4".to_string(),
                est_duration: "10m".to_string(),
                description: "Third class".to_string(),
            },
        ];

        let bytes = processor().process_batch(&rows, &|_: f64, _: &str| {}).await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        // The bad row contributes an error note, not generated files.
        assert!(names.contains(&"class_2_broken-class/error.txt".to_string()));
        assert!(!names.contains(&"class_2_broken-class/class_outline.md".to_string()));
        // Rows before and after it are processed normally.
        assert!(names.contains(&"class_1_first-class/class_outline.md".to_string()));
        assert!(names.contains(&"class_3_third-class/video_script.md".to_string()));

        let mut note = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("class_2_broken-class/error.txt").unwrap(),
            &mut note,
        )
        .unwrap();
        assert!(note.contains("est_duration"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_validation_error() {
        let err = processor().process_batch(&[], &|_: f64, _: &str| {}).await.unwrap_err();
        assert!(matches!(err, LaereError::Validation(_)));
    }
}
