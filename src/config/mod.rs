//! Configuration management for Laere.

mod prompts;
mod settings;

pub use prompts::{ArtifactPrompts, NotesPrompts, Prompts};
pub use settings::{
    GeneralSettings, GenerationSettings, NotesSettings, PromptSettings, Settings, SpeechSettings,
    VideoRenderSettings,
};
