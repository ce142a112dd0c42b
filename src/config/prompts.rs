//! Prompt templates for Laere.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory. Each artifact kind has a system prompt (persona plus the JSON
//! schema the model must return) and a user prompt (task parameters plus the
//! source excerpt).

use crate::artifact::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub outline: ArtifactPrompts,
    pub instructor_guide: ArtifactPrompts,
    pub video_script: ArtifactPrompts,
    pub quick_reference: ArtifactPrompts,
    pub notes: NotesPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self::default_templates()
    }
}

/// System/user prompt pair for one artifact kind.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArtifactPrompts {
    pub system: String,
    pub user: String,
}

fn default_user_prompt() -> String {
    r#"Course title: {{course_title}}
Class type: {{class_type}}

Use the following source material as guidance:
{{source_excerpt}}"#
        .to_string()
}

fn default_outline_prompts() -> ArtifactPrompts {
    ArtifactPrompts {
        system: r#"You are an expert instructional designer who produces clear, structured, actionable class outlines.
Return ONLY valid JSON matching EXACTLY this structure:

{
  "title": "string",
  "sections": [
    {
      "title": "string",
      "objectives": ["string"],
      "duration_minutes": 30,
      "subtopics": ["string"]
    }
  ]
}

No markdown. No commentary. JSON only."#
            .to_string(),
        user: default_user_prompt(),
    }
}

fn default_instructor_guide_prompts() -> ArtifactPrompts {
    ArtifactPrompts {
        system: r#"You create detailed instructor guides that include learning objectives, instructional steps, key points, setup requirements, and time estimates.
Return ONLY valid JSON matching EXACTLY this structure:

{
  "training_plan_and_goals": "string",
  "target_audience": "string",
  "prerequisites": "string",
  "environment_status": "string",
  "class_type": "string",
  "learning_objectives": ["string"],
  "required_materials_and_equipment": ["string"],
  "instructor_setup": ["string"],
  "participant_setup": ["string"],
  "handouts": ["string"],
  "before_class_checklist": ["string"],
  "start_of_class_checklist": ["string"],
  "after_class_checklist": ["string"],
  "sections": [
    {
      "title": "string",
      "learning_objectives": ["string"],
      "instructional_steps": ["string"],
      "key_points": ["string"],
      "estimated_time_minutes": 20
    }
  ]
}

No markdown. No commentary. JSON only."#
            .to_string(),
        user: default_user_prompt(),
    }
}

fn default_video_script_prompts() -> ArtifactPrompts {
    ArtifactPrompts {
        system: r#"You write high-quality training video scripts with spoken narration and precise screen directions.
Return ONLY valid JSON matching EXACTLY this structure:

{
  "course_title": "string",
  "segments": [
    {
      "title": "string",
      "narration": "string",
      "screen_directions": "string",
      "approx_duration_seconds": 60
    }
  ]
}

No markdown. No commentary. JSON only."#
            .to_string(),
        user: default_user_prompt(),
    }
}

fn default_quick_reference_prompts() -> ArtifactPrompts {
    ArtifactPrompts {
        system: r#"You create concise, numbered quick reference guides with clear action steps.
Return ONLY valid JSON matching EXACTLY this structure:

{
  "course_title": "string",
  "steps": [
    {
      "step_number": 1,
      "title": "string",
      "action": "string",
      "notes": "string"
    }
  ]
}

No markdown. No commentary. JSON only."#
            .to_string(),
        user: default_user_prompt(),
    }
}

/// Prompts for handwritten-notes transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesPrompts {
    pub instruction: String,
}

impl Default for NotesPrompts {
    fn default() -> Self {
        Self {
            instruction: "Transcribe the handwritten notes in this image as clean, plain text. \
                          Fix obvious spelling mistakes, but do not add new ideas or explanations. \
                          Use short bullet points where it helps readability."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default_templates();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let outline_path = custom_path.join("outline.toml");
            if outline_path.exists() {
                let content = std::fs::read_to_string(&outline_path)?;
                prompts.outline = toml::from_str(&content)?;
            }

            let guide_path = custom_path.join("instructor_guide.toml");
            if guide_path.exists() {
                let content = std::fs::read_to_string(&guide_path)?;
                prompts.instructor_guide = toml::from_str(&content)?;
            }

            let script_path = custom_path.join("video_script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.video_script = toml::from_str(&content)?;
            }

            let qrg_path = custom_path.join("quick_reference.toml");
            if qrg_path.exists() {
                let content = std::fs::read_to_string(&qrg_path)?;
                prompts.quick_reference = toml::from_str(&content)?;
            }

            let notes_path = custom_path.join("notes.toml");
            if notes_path.exists() {
                let content = std::fs::read_to_string(&notes_path)?;
                prompts.notes = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Construct prompts with the built-in default templates.
    pub fn default_templates() -> Self {
        Self {
            outline: default_outline_prompts(),
            instructor_guide: default_instructor_guide_prompts(),
            video_script: default_video_script_prompts(),
            quick_reference: default_quick_reference_prompts(),
            notes: NotesPrompts::default(),
            variables: std::collections::HashMap::new(),
        }
    }

    /// Get the prompt pair for an artifact kind.
    pub fn artifact(&self, kind: ArtifactKind) -> &ArtifactPrompts {
        match kind {
            ArtifactKind::Outline => &self.outline,
            ArtifactKind::InstructorGuide => &self.instructor_guide,
            ArtifactKind::VideoScript => &self.video_script,
            ArtifactKind::QuickReference => &self.quick_reference,
        }
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default_templates();
        assert!(prompts.outline.system.contains("JSON"));
        assert!(prompts.instructor_guide.system.contains("instructional_steps"));
        assert!(prompts.quick_reference.system.contains("step_number"));
    }

    #[test]
    fn test_render_template() {
        let template = "Course title: {{course_title}} ({{class_type}})";
        let mut vars = std::collections::HashMap::new();
        vars.insert("course_title".to_string(), "Intro to Widgets".to_string());
        vars.insert("class_type".to_string(), "Full Class".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Course title: Intro to Widgets (Full Class)");
    }

    #[test]
    fn test_custom_variables_do_not_override_provided() {
        let mut prompts = Prompts::default_templates();
        prompts
            .variables
            .insert("course_title".to_string(), "From Config".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("course_title".to_string(), "From Call".to_string());

        let result = prompts.render_with_custom("{{course_title}}", &vars);
        assert_eq!(result, "From Call");
    }
}
