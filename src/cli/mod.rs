//! CLI module for Laere.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Laere - Training Package Generation
///
/// A CLI tool that turns instructor source material into structured training
/// artifacts. The name "Laere" comes from the Norwegian word for "learn."
#[derive(Parser, Debug)]
#[command(name = "laere")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a training package from source material
    Generate {
        /// Course title
        #[arg(short, long)]
        title: String,

        /// Class type (e.g. "Full Class", "Video Walkthrough")
        #[arg(long, default_value = "Full Class")]
        class_type: String,

        /// Document files to extract text from (txt, md)
        #[arg(short, long)]
        files: Vec<PathBuf>,

        /// Audio recordings to transcribe
        #[arg(short, long)]
        audio: Vec<PathBuf>,

        /// Photos of handwritten notes to transcribe
        #[arg(short, long)]
        notes: Vec<PathBuf>,

        /// Output directory for the generated markdown files
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Synthesize narration audio for the video script
        #[arg(long)]
        narrate: bool,

        /// API key override for this run
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Process a CSV of course descriptions into a ZIP of materials
    Batch {
        /// CSV file with columns: #, video_file, est_duration, brief_description
        input: PathBuf,

        /// Output ZIP path
        #[arg(short, long, default_value = "./batch_output.zip")]
        output: PathBuf,

        /// Synthesize narration audio for each video script
        #[arg(long)]
        narrate: bool,
    },

    /// Render an avatar video from a narration script
    Render {
        /// Text file containing the narration script
        script: PathBuf,

        /// Avatar id override
        #[arg(long)]
        avatar: Option<String>,

        /// Voice id override
        #[arg(long)]
        voice: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. "generation.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
