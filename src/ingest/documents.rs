//! Text extraction from uploaded documents.
//!
//! Extraction never fails: unsupported file types and read failures produce
//! a labeled inline error string so aggregation can proceed with whatever
//! partial input is available.

use std::path::Path;
use tracing::warn;

/// Extract text from a single file's bytes, labeled by filename.
///
/// Plain-text formats are decoded directly. Binary document formats (PDF,
/// DOCX) require an external extractor and are reported as unsupported here
/// rather than failing the request.
pub fn extract_file(bytes: &[u8], filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "md" | "text" => String::from_utf8_lossy(bytes).into_owned(),
        "pdf" | "doc" | "docx" => {
            warn!("No extractor available for {}", filename);
            format!(
                "[Could not extract text from {}: .{} extraction requires an external text extractor]",
                filename, ext
            )
        }
        _ => {
            warn!("Unsupported file type: {}", filename);
            format!("[Could not extract text from {}: unsupported file type]", filename)
        }
    }
}

/// Extract text from a set of uploaded files, prefixing each file's text
/// with a `[Source: name]` provenance marker.
pub fn extract_documents(files: &[(String, Vec<u8>)]) -> String {
    let mut sections: Vec<String> = Vec::new();

    for (name, bytes) in files {
        let text = extract_file(bytes, name);
        if !text.trim().is_empty() {
            sections.push(format!("[Source: {}]\n{}", name, text.trim()));
        }
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let text = extract_file(b"hello world", "notes.txt");
        assert_eq!(text, "hello world");
    }

    #[test]
    fn test_unsupported_extension_yields_labeled_error() {
        let text = extract_file(&[0u8; 4], "image.bmp");
        assert!(text.contains("image.bmp"));
        assert!(text.contains("unsupported"));
    }

    #[test]
    fn test_binary_document_yields_labeled_error() {
        let text = extract_file(b"%PDF-1.4", "slides.pdf");
        assert!(text.contains("slides.pdf"));
        assert!(text.starts_with('['));
    }

    #[test]
    fn test_extract_documents_adds_provenance() {
        let files = vec![
            ("a.txt".to_string(), b"first".to_vec()),
            ("b.txt".to_string(), b"second".to_vec()),
        ];
        let text = extract_documents(&files);
        assert!(text.contains("[Source: a.txt]"));
        assert!(text.contains("[Source: b.txt]"));
        assert!(text.find("first").unwrap() < text.find("second").unwrap());
    }
}
