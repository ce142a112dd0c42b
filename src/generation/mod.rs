//! Structured artifact generation.
//!
//! The pipeline per artifact kind: build a system/user prompt pair, ask the
//! model for JSON, defensively parse the reply into the typed domain model,
//! and fall back to a deterministic template on any failure. The caller
//! always receives a complete package.

mod client;
mod fallback;
mod orchestrator;
mod parsers;

pub use client::{format_source_excerpt, OpenAiGenerator, StructuredGenerator, EXCERPT_TRUNCATION_MARKER};
pub use fallback::{
    fallback_instructor_guide, fallback_outline, fallback_quick_reference, fallback_video_script,
};
pub use orchestrator::{PackageGenerator, PackageOutcome};
pub use parsers::{
    parse_instructor_guide, parse_outline, parse_quick_reference, parse_video_script,
};
