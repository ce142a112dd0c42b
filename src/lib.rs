//! Laere - Training Package Generation
//!
//! A CLI tool that turns instructor source material into structured training
//! artifacts: a class outline, an instructor guide, a video script, and a
//! quick-reference guide.
//!
//! The name "Laere" comes from the Norwegian word for "learn."
//!
//! # Overview
//!
//! Laere allows you to:
//! - Extract text from documents, audio recordings, and handwritten notes
//! - Generate the four training artifacts with an LLM, with deterministic
//!   fallback templates when generation fails
//! - Export every artifact as markdown
//! - Process whole course catalogs in batch, producing a ZIP per run
//! - Synthesize narration audio and render avatar videos for scripts
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `artifact` - Typed domain model for the four artifacts
//! - `ingest` - Source extraction and aggregation
//! - `generation` - Structured LLM client, parsers, fallbacks, orchestrator
//! - `export` - Markdown exporters
//! - `speech` - Transcription and narration synthesis
//! - `render` - Third-party avatar video rendering
//! - `batch` - Batch processing of tabular job descriptions
//! - `session` - Request-scoped session state
//!
//! # Example
//!
//! ```rust,no_run
//! use laere::config::Settings;
//! use laere::generation::PackageGenerator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let generator = PackageGenerator::new(&settings, None)?;
//!
//!     let outcome = generator
//!         .build_package("Widgets are small mechanical parts...", "Intro to Widgets", "Full Class")
//!         .await;
//!     println!("Outline has {} sections", outcome.package.outline.sections.len());
//!
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingest;
pub mod openai;
pub mod render;
pub mod session;
pub mod speech;

pub use error::{LaereError, Result};
