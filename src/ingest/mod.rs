//! Source ingestion: extraction and aggregation of heterogeneous inputs.
//!
//! Document text, audio transcripts, and handwritten-note text are produced
//! independently (failing in isolation, substituting empty text) and merged
//! into one ordered blob before any generation starts.

mod documents;
mod notes;

pub use documents::{extract_documents, extract_file};
pub use notes::NotesOcr;

/// Marker prefixed to transcript text in the aggregated blob.
pub const TRANSCRIPT_MARKER: &str = "[Audio Transcript]";

/// Marker prefixed to handwritten-note text in the aggregated blob.
pub const NOTES_MARKER: &str = "[Handwritten Notes]";

/// Canonical fallback sentence used when all sources are empty.
///
/// Downstream prompts rely on this exact sentence being present, so it is a
/// contract rather than a display string.
pub const FALLBACK_SOURCE_TEXT: &str =
    "No source material was provided. Generate a generic training package based only on the \
     course title and class type, following instructional design best practices.";

/// Merge extracted document text, transcript text, and note text into one
/// ordered text blob with labeled provenance markers.
///
/// Inputs are independently optional. When all three are empty the canonical
/// fallback sentence is returned, so the result is never empty.
pub fn aggregate(document_text: &str, transcript_text: &str, notes_text: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !document_text.trim().is_empty() {
        parts.push(document_text.trim().to_string());
    }
    if !transcript_text.trim().is_empty() {
        parts.push(format!("{}\n{}", TRANSCRIPT_MARKER, transcript_text.trim()));
    }
    if !notes_text.trim().is_empty() {
        parts.push(format!("{}\n{}", NOTES_MARKER, notes_text.trim()));
    }

    if parts.is_empty() {
        return FALLBACK_SOURCE_TEXT.to_string();
    }

    parts.join("\n\n").trim().to_string()
}
