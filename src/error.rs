//! Error types for Laere.

use thiserror::Error;

/// Library-level error type for Laere operations.
///
/// Variants map onto the failure taxonomy used throughout the pipeline:
/// extraction and speech errors are isolated per item, generation failures
/// are resolved by fallback templates at the orchestrator boundary, and
/// validation errors propagate to the immediate caller before any work
/// starts.
#[derive(Error, Debug)]
pub enum LaereError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Speech service error: {0}")]
    Speech(String),

    #[error("Video render error: {0}")]
    VideoRender(String),

    #[error("Video render timed out after {0} seconds")]
    VideoRenderTimeout(u64),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// Result type alias for Laere operations.
pub type Result<T> = std::result::Result<T, LaereError>;
