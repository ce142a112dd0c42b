//! Deterministic fallback templates.
//!
//! Used verbatim whenever generation or parsing fails, so the user always
//! receives a complete package. Pure functions, no I/O, parameterized only
//! by the course title.

use crate::artifact::{
    ClassOutline, InstructorGuide, InstructorSection, OutlineSection, QuickRefStep,
    QuickReferenceGuide, VideoScript, VideoSegment,
};

/// Minimal class outline for a course.
pub fn fallback_outline(course_title: &str) -> ClassOutline {
    ClassOutline {
        title: course_title.to_string(),
        sections: vec![
            OutlineSection {
                title: "Introduction".to_string(),
                objectives: vec![
                    format!("Understand the goals of {}", course_title),
                    "Set expectations for the session".to_string(),
                ],
                duration_minutes: Some(10),
                subtopics: vec!["Welcome".to_string(), "Agenda".to_string()],
            },
            OutlineSection {
                title: "Core Concepts".to_string(),
                objectives: vec![
                    "Learn the fundamental concepts".to_string(),
                    "Review worked examples".to_string(),
                ],
                duration_minutes: Some(30),
                subtopics: vec!["Key terminology".to_string(), "Demonstrations".to_string()],
            },
            OutlineSection {
                title: "Wrap-up and Questions".to_string(),
                objectives: vec!["Consolidate what was covered".to_string()],
                duration_minutes: Some(10),
                subtopics: vec!["Summary".to_string(), "Q&A".to_string()],
            },
        ],
    }
}

/// Minimal instructor guide for a course.
pub fn fallback_instructor_guide(course_title: &str) -> InstructorGuide {
    InstructorGuide {
        training_plan_and_goals: format!(
            "Deliver an introductory session on {} covering its core concepts and workflow.",
            course_title
        ),
        target_audience: "Participants new to the subject".to_string(),
        prerequisites: "None".to_string(),
        environment_status: "Standard classroom or virtual session".to_string(),
        class_type: "Full Class".to_string(),
        learning_objectives: vec![
            format!("Explain the purpose of {}", course_title),
            "Apply the basic workflow end to end".to_string(),
        ],
        required_materials_and_equipment: vec![
            "Projector or screen share".to_string(),
            "Participant workstations".to_string(),
        ],
        instructor_setup: vec!["Review the outline and test the demo environment".to_string()],
        participant_setup: vec!["Sign in and verify access before the session".to_string()],
        handouts: vec!["Quick reference guide".to_string()],
        before_class_checklist: vec![
            "Confirm room or meeting link".to_string(),
            "Load demo materials".to_string(),
        ],
        start_of_class_checklist: vec![
            "Welcome participants".to_string(),
            "State the session objectives".to_string(),
        ],
        after_class_checklist: vec![
            "Share handouts and recordings".to_string(),
            "Collect feedback".to_string(),
        ],
        sections: vec![
            InstructorSection {
                title: "Kickoff".to_string(),
                learning_objectives: vec!["Establish rapport and preview the agenda".to_string()],
                instructional_steps: vec![
                    "Welcome participants and introduce yourself".to_string(),
                    format!("Outline what {} will cover", course_title),
                ],
                key_points: vec!["Set clear expectations early".to_string()],
                estimated_time_minutes: Some(5),
            },
            InstructorSection {
                title: "Hands-on Walkthrough".to_string(),
                learning_objectives: vec!["Practice the core workflow".to_string()],
                instructional_steps: vec![
                    "Demonstrate the key steps live".to_string(),
                    "Have participants repeat the steps themselves".to_string(),
                ],
                key_points: vec![
                    "Highlight common pitfalls".to_string(),
                    "Pause for questions after each step".to_string(),
                ],
                estimated_time_minutes: Some(25),
            },
        ],
    }
}

/// Minimal video script for a course.
pub fn fallback_video_script(course_title: &str) -> VideoScript {
    VideoScript {
        course_title: course_title.to_string(),
        segments: vec![
            VideoSegment {
                title: "Overview".to_string(),
                narration: format!(
                    "Welcome to {}. In this lesson, we'll cover the essentials you need to get started.",
                    course_title
                ),
                screen_directions: "Show title slide, slow zoom, then fade to the main screen."
                    .to_string(),
                approx_duration_seconds: Some(45),
            },
            VideoSegment {
                title: "Doing the Work".to_string(),
                narration:
                    "Let's walk through the core workflow step by step, starting from a clean state."
                        .to_string(),
                screen_directions:
                    "Capture the cursor performing each step, highlight the relevant fields, zoom on confirmation."
                        .to_string(),
                approx_duration_seconds: Some(75),
            },
            VideoSegment {
                title: "Recap".to_string(),
                narration: "That covers the essentials. Review the quick reference guide for a summary of each step."
                    .to_string(),
                screen_directions: "Return to summary slide listing the main steps.".to_string(),
                approx_duration_seconds: Some(30),
            },
        ],
    }
}

/// Minimal quick reference guide for a course.
pub fn fallback_quick_reference(course_title: &str) -> QuickReferenceGuide {
    QuickReferenceGuide {
        course_title: course_title.to_string(),
        steps: vec![
            QuickRefStep {
                step_number: 1,
                title: "Set Up".to_string(),
                action: "Open the application and sign in with your credentials.".to_string(),
                notes: Some("Use SSO when available.".to_string()),
            },
            QuickRefStep {
                step_number: 2,
                title: "Do the Core Task".to_string(),
                action: "Follow the demonstrated workflow, filling in all required fields."
                    .to_string(),
                notes: Some("Fields marked * are mandatory.".to_string()),
            },
            QuickRefStep {
                step_number: 3,
                title: "Verify and Save".to_string(),
                action: "Review your entries and press Save.".to_string(),
                notes: None,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_are_never_empty() {
        let title = "Intro to Widgets";
        assert!(!fallback_outline(title).sections.is_empty());
        assert!(!fallback_instructor_guide(title).sections.is_empty());
        assert!(!fallback_video_script(title).segments.is_empty());
        assert!(!fallback_quick_reference(title).steps.is_empty());
    }

    #[test]
    fn test_fallbacks_reflect_title() {
        let title = "Intro to Widgets";
        assert!(fallback_outline(title).title.contains(title));
        assert!(fallback_instructor_guide(title)
            .training_plan_and_goals
            .contains(title));
        assert!(fallback_video_script(title).course_title.contains(title));
        assert!(fallback_quick_reference(title).course_title.contains(title));
    }

    #[test]
    fn test_fallback_step_numbers_are_valid() {
        let qrg = fallback_quick_reference("T");
        for (i, step) in qrg.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
    }

    #[test]
    fn test_fallbacks_are_deterministic() {
        assert_eq!(fallback_outline("T"), fallback_outline("T"));
        assert_eq!(fallback_video_script("T"), fallback_video_script("T"));
    }
}
