//! Markdown exporters for generated training artifacts.
//!
//! Pure, deterministic rendering with a fixed heading hierarchy per
//! artifact. Labeled sub-blocks are omitted entirely when their backing
//! field is empty, and output is byte-stable for identical input.

use crate::artifact::{
    ClassOutline, GeneratedPackage, InstructorGuide, QuickReferenceGuide, VideoScript,
};

fn push_bullets(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("### {}", heading));
    for item in items {
        lines.push(format!("- {}", item));
    }
    lines.push(String::new());
}

fn push_paragraph(lines: &mut Vec<String>, heading: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    lines.push(format!("## {}", heading));
    lines.push(text.trim().to_string());
    lines.push(String::new());
}

/// Convert a class outline into markdown.
pub fn outline_to_markdown(outline: &ClassOutline) -> String {
    let mut lines: Vec<String> = vec![format!("# {}", outline.title), String::new()];

    for section in &outline.sections {
        lines.push(format!("## {}", section.title));
        push_bullets(&mut lines, "Objectives", &section.objectives);
        push_bullets(&mut lines, "Subtopics", &section.subtopics);
        if let Some(minutes) = section.duration_minutes {
            lines.push(format!("**Duration:** {} minutes", minutes));
            lines.push(String::new());
        }
    }

    lines.join("\n").trim().to_string()
}

/// Convert an instructor guide into markdown.
pub fn instructor_guide_to_markdown(guide: &InstructorGuide) -> String {
    let mut lines: Vec<String> = vec!["# Instructor Guide".to_string(), String::new()];

    if !guide.class_type.trim().is_empty() {
        lines.push(format!("**Class Type:** {}", guide.class_type.trim()));
        lines.push(String::new());
    }

    push_paragraph(&mut lines, "Training Plan and Goals", &guide.training_plan_and_goals);
    push_paragraph(&mut lines, "Target Audience", &guide.target_audience);
    push_paragraph(&mut lines, "Prerequisites", &guide.prerequisites);
    push_paragraph(&mut lines, "Environment Status", &guide.environment_status);

    if !guide.learning_objectives.is_empty() {
        lines.push("## Learning Objectives".to_string());
        for obj in &guide.learning_objectives {
            lines.push(format!("- {}", obj));
        }
        lines.push(String::new());
    }

    for (heading, items) in [
        ("Required Materials and Equipment", &guide.required_materials_and_equipment),
        ("Instructor Setup", &guide.instructor_setup),
        ("Participant Setup", &guide.participant_setup),
        ("Handouts", &guide.handouts),
        ("Before Class Checklist", &guide.before_class_checklist),
        ("Start of Class Checklist", &guide.start_of_class_checklist),
        ("After Class Checklist", &guide.after_class_checklist),
    ] {
        if !items.is_empty() {
            lines.push(format!("## {}", heading));
            for item in items.iter() {
                lines.push(format!("- {}", item));
            }
            lines.push(String::new());
        }
    }

    for section in &guide.sections {
        lines.push(format!("## {}", section.title));
        push_bullets(&mut lines, "Learning Objectives", &section.learning_objectives);
        push_bullets(&mut lines, "Instructional Steps", &section.instructional_steps);
        push_bullets(&mut lines, "Key Points", &section.key_points);
        if let Some(minutes) = section.estimated_time_minutes {
            lines.push(format!("**Estimated Time:** {} minutes", minutes));
            lines.push(String::new());
        }
    }

    lines.join("\n").trim().to_string()
}

/// Convert a video script into markdown.
pub fn video_script_to_markdown(script: &VideoScript) -> String {
    let mut lines: Vec<String> = vec![
        format!("# Video Script: {}", script.course_title),
        String::new(),
    ];

    for (idx, segment) in script.segments.iter().enumerate() {
        lines.push(format!("## Segment {}: {}", idx + 1, segment.title));
        if !segment.narration.trim().is_empty() {
            lines.push("### Narration".to_string());
            lines.push(segment.narration.trim().to_string());
            lines.push(String::new());
        }
        if !segment.screen_directions.trim().is_empty() {
            lines.push("### Screen Directions".to_string());
            lines.push(segment.screen_directions.trim().to_string());
            lines.push(String::new());
        }
        if let Some(seconds) = segment.approx_duration_seconds {
            lines.push(format!("**Approx Duration:** {} seconds", seconds));
            lines.push(String::new());
        }
    }

    lines.join("\n").trim().to_string()
}

/// Convert a quick reference guide into markdown.
pub fn quick_reference_to_markdown(qrg: &QuickReferenceGuide) -> String {
    let mut lines: Vec<String> = vec![
        format!("# Quick Reference Guide: {}", qrg.course_title),
        String::new(),
    ];

    for step in &qrg.steps {
        lines.push(format!("## Step {}: {}", step.step_number, step.title));
        if !step.action.trim().is_empty() {
            lines.push(format!("**Action:** {}", step.action.trim()));
        }
        if let Some(notes) = &step.notes {
            if !notes.trim().is_empty() {
                lines.push(format!("**Notes:** {}", notes.trim()));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

/// Render every artifact in a package to `(filename, markdown)` pairs.
pub fn package_to_markdown(package: &GeneratedPackage) -> Vec<(String, String)> {
    vec![
        ("class_outline.md".to_string(), outline_to_markdown(&package.outline)),
        (
            "instructor_guide.md".to_string(),
            instructor_guide_to_markdown(&package.instructor_guide),
        ),
        (
            "video_script.md".to_string(),
            video_script_to_markdown(&package.video_script),
        ),
        (
            "quick_reference.md".to_string(),
            quick_reference_to_markdown(&package.quick_reference),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{OutlineSection, QuickRefStep, VideoSegment};
    use crate::generation::{fallback_instructor_guide, fallback_outline};

    #[test]
    fn test_outline_markdown_shape() {
        let outline = ClassOutline {
            title: "Intro to Widgets".to_string(),
            sections: vec![OutlineSection {
                title: "Basics".to_string(),
                objectives: vec!["Know widgets".to_string()],
                duration_minutes: Some(15),
                subtopics: vec![],
            }],
        };

        let md = outline_to_markdown(&outline);
        assert!(md.starts_with("# Intro to Widgets"));
        assert!(md.contains("## Basics"));
        assert!(md.contains("### Objectives"));
        assert!(md.contains("- Know widgets"));
        assert!(md.contains("**Duration:** 15 minutes"));
        // Empty subtopics block is omitted entirely.
        assert!(!md.contains("Subtopics"));
    }

    #[test]
    fn test_markdown_idempotence() {
        let outline = fallback_outline("Intro to Widgets");
        assert_eq!(outline_to_markdown(&outline), outline_to_markdown(&outline));

        let guide = fallback_instructor_guide("Intro to Widgets");
        assert_eq!(
            instructor_guide_to_markdown(&guide),
            instructor_guide_to_markdown(&guide)
        );
    }

    #[test]
    fn test_empty_artifact_renders_title_only() {
        let outline = ClassOutline {
            title: "Empty".to_string(),
            sections: vec![],
        };
        assert_eq!(outline_to_markdown(&outline), "# Empty");

        let script = VideoScript {
            course_title: "Empty".to_string(),
            segments: vec![],
        };
        assert_eq!(video_script_to_markdown(&script), "# Video Script: Empty");
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let md = outline_to_markdown(&fallback_outline("T"));
        assert_eq!(md, md.trim());
    }

    #[test]
    fn test_quick_reference_markdown() {
        let qrg = QuickReferenceGuide {
            course_title: "T".to_string(),
            steps: vec![QuickRefStep {
                step_number: 2,
                title: "Save".to_string(),
                action: "Press Save.".to_string(),
                notes: None,
            }],
        };

        let md = quick_reference_to_markdown(&qrg);
        assert!(md.contains("## Step 2: Save"));
        assert!(md.contains("**Action:** Press Save."));
        assert!(!md.contains("**Notes:**"));
    }

    #[test]
    fn test_package_to_markdown_covers_all_artifacts() {
        let package = GeneratedPackage::default();
        let files = package_to_markdown(&package);
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].0, "class_outline.md");
    }

    #[test]
    fn test_video_segment_duration_rendered() {
        let script = VideoScript {
            course_title: "T".to_string(),
            segments: vec![VideoSegment {
                title: "Intro".to_string(),
                narration: "Hello".to_string(),
                screen_directions: "Fade in".to_string(),
                approx_duration_seconds: Some(45),
            }],
        };

        let md = video_script_to_markdown(&script);
        assert!(md.contains("## Segment 1: Intro"));
        assert!(md.contains("**Approx Duration:** 45 seconds"));
    }
}
