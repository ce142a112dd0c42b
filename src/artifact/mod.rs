//! Typed domain model for generated training artifacts.
//!
//! A generation request produces exactly four artifacts, bundled as a
//! [`GeneratedPackage`]. Every sequence field defaults to empty rather than
//! being absent, and a package is never partially constructed: each field is
//! either model output or a fallback template.

use serde::{Deserialize, Serialize};

/// The four artifact kinds produced by one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Outline,
    InstructorGuide,
    VideoScript,
    QuickReference,
}

impl ArtifactKind {
    /// All kinds, in generation order.
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Outline,
        ArtifactKind::InstructorGuide,
        ArtifactKind::VideoScript,
        ArtifactKind::QuickReference,
    ];

    /// Markdown filename used when exporting this kind.
    pub fn filename(&self) -> &'static str {
        match self {
            ArtifactKind::Outline => "class_outline.md",
            ArtifactKind::InstructorGuide => "instructor_guide.md",
            ArtifactKind::VideoScript => "video_script.md",
            ArtifactKind::QuickReference => "quick_reference.md",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactKind::Outline => "class outline",
            ArtifactKind::InstructorGuide => "instructor guide",
            ArtifactKind::VideoScript => "video script",
            ArtifactKind::QuickReference => "quick reference guide",
        };
        write!(f, "{}", name)
    }
}

/// A class outline: title plus ordered sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassOutline {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<OutlineSection>,
}

/// One section of a class outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub title: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub subtopics: Vec<String>,
}

/// An instructor guide with front matter, setup lists, checklists, and
/// teaching sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructorGuide {
    #[serde(default)]
    pub training_plan_and_goals: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub environment_status: String,
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub required_materials_and_equipment: Vec<String>,
    #[serde(default)]
    pub instructor_setup: Vec<String>,
    #[serde(default)]
    pub participant_setup: Vec<String>,
    #[serde(default)]
    pub handouts: Vec<String>,
    #[serde(default)]
    pub before_class_checklist: Vec<String>,
    #[serde(default)]
    pub start_of_class_checklist: Vec<String>,
    #[serde(default)]
    pub after_class_checklist: Vec<String>,
    #[serde(default)]
    pub sections: Vec<InstructorSection>,
}

/// One teaching section of an instructor guide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructorSection {
    pub title: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub instructional_steps: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub estimated_time_minutes: Option<u32>,
}

/// A training video script: course title plus ordered segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoScript {
    pub course_title: String,
    #[serde(default)]
    pub segments: Vec<VideoSegment>,
}

/// One segment of a video script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSegment {
    pub title: String,
    #[serde(default)]
    pub narration: String,
    #[serde(default)]
    pub screen_directions: String,
    #[serde(default)]
    pub approx_duration_seconds: Option<u32>,
}

/// A quick reference guide: course title plus ordered numbered steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickReferenceGuide {
    pub course_title: String,
    #[serde(default)]
    pub steps: Vec<QuickRefStep>,
}

/// One numbered step of a quick reference guide.
///
/// Step numbers are accepted as-is from the model; gaps and duplicates are
/// not corrected. When a number is absent or unparsable the parser assigns
/// the step's position instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickRefStep {
    pub step_number: u32,
    pub title: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The four artifacts produced by one generation request.
///
/// Always complete: a field is either model output or a fallback template,
/// never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPackage {
    pub outline: ClassOutline,
    pub instructor_guide: InstructorGuide,
    pub video_script: VideoScript,
    pub quick_reference: QuickReferenceGuide,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_default_empty() {
        let guide = InstructorGuide::default();
        assert!(guide.sections.is_empty());
        assert!(guide.handouts.is_empty());

        let json: InstructorGuide = serde_json::from_str("{}").unwrap();
        assert!(json.learning_objectives.is_empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ArtifactKind::Outline.to_string(), "class outline");
        assert_eq!(ArtifactKind::ALL.len(), 4);
    }
}
