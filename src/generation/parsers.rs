//! Defensive parsers from loosely-typed model JSON into the domain model.
//!
//! Every parser is a total function: any JSON-like value, including `{}` or
//! something that is not an object at all, produces a fully-formed artifact.
//! Malformed nested items (a section that is not an object, for example) are
//! dropped individually without invalidating the rest of the artifact.

use crate::artifact::{
    ClassOutline, InstructorGuide, InstructorSection, OutlineSection, QuickRefStep,
    QuickReferenceGuide, VideoScript, VideoSegment,
};
use serde_json::{Map, Value};

/// Read a string field, substituting a default when absent or wrong-shaped.
fn field_str(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Read an optional string field.
fn field_opt_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Read a list-of-strings field. Non-string entries that have an obvious
/// textual form (numbers) are stringified; everything else is dropped.
fn field_string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = obj.get(key) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Read an optional non-negative integer field, accepting numeric strings.
fn field_opt_u32(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Get the list under `key` as raw values, empty if absent or wrong-shaped.
fn raw_items<'a>(payload: &'a Value, key: &str) -> Vec<&'a Value> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

/// Parse a class outline. The outline title falls back to
/// `"{course_title} ({class_type})"` when the model omits it.
pub fn parse_outline(payload: &Value, course_title: &str, class_type: &str) -> ClassOutline {
    let mut sections: Vec<OutlineSection> = Vec::new();

    for item in raw_items(payload, "sections") {
        let Some(obj) = item.as_object() else {
            continue;
        };
        sections.push(OutlineSection {
            title: field_str(obj, "title", "Untitled Section"),
            objectives: field_string_list(obj, "objectives"),
            duration_minutes: field_opt_u32(obj, "duration_minutes"),
            subtopics: field_string_list(obj, "subtopics"),
        });
    }

    let default_title = format!("{} ({})", course_title, class_type);
    let title = payload
        .as_object()
        .map(|obj| field_str(obj, "title", &default_title))
        .unwrap_or(default_title);

    ClassOutline { title, sections }
}

/// Parse an instructor guide. The guide's class type falls back to the
/// requested class type.
pub fn parse_instructor_guide(payload: &Value, class_type: &str) -> InstructorGuide {
    let empty = Map::new();
    let obj = payload.as_object().unwrap_or(&empty);

    let mut sections: Vec<InstructorSection> = Vec::new();
    for item in raw_items(payload, "sections") {
        let Some(section) = item.as_object() else {
            continue;
        };
        sections.push(InstructorSection {
            title: field_str(section, "title", "Untitled Section"),
            learning_objectives: field_string_list(section, "learning_objectives"),
            instructional_steps: field_string_list(section, "instructional_steps"),
            key_points: field_string_list(section, "key_points"),
            estimated_time_minutes: field_opt_u32(section, "estimated_time_minutes"),
        });
    }

    InstructorGuide {
        training_plan_and_goals: field_str(obj, "training_plan_and_goals", ""),
        target_audience: field_str(obj, "target_audience", ""),
        prerequisites: field_str(obj, "prerequisites", ""),
        environment_status: field_str(obj, "environment_status", ""),
        class_type: field_str(obj, "class_type", class_type),
        learning_objectives: field_string_list(obj, "learning_objectives"),
        required_materials_and_equipment: field_string_list(obj, "required_materials_and_equipment"),
        instructor_setup: field_string_list(obj, "instructor_setup"),
        participant_setup: field_string_list(obj, "participant_setup"),
        handouts: field_string_list(obj, "handouts"),
        before_class_checklist: field_string_list(obj, "before_class_checklist"),
        start_of_class_checklist: field_string_list(obj, "start_of_class_checklist"),
        after_class_checklist: field_string_list(obj, "after_class_checklist"),
        sections,
    }
}

/// Parse a video script. The course title falls back to the requested one.
pub fn parse_video_script(payload: &Value, course_title: &str) -> VideoScript {
    let mut segments: Vec<VideoSegment> = Vec::new();

    for item in raw_items(payload, "segments") {
        let Some(obj) = item.as_object() else {
            continue;
        };
        segments.push(VideoSegment {
            title: field_str(obj, "title", "Untitled Segment"),
            narration: field_str(obj, "narration", ""),
            screen_directions: field_str(obj, "screen_directions", ""),
            approx_duration_seconds: field_opt_u32(obj, "approx_duration_seconds"),
        });
    }

    let title = payload
        .as_object()
        .map(|obj| field_str(obj, "course_title", course_title))
        .unwrap_or_else(|| course_title.to_string());

    VideoScript {
        course_title: title,
        segments,
    }
}

/// Parse a quick reference guide.
///
/// Step numbering policy: a valid model-provided number (a positive
/// integer, possibly given as a numeric string) passes through verbatim,
/// gaps and duplicates included. An absent or unparsable number is replaced
/// with the step's position among the accumulated steps (`accumulated + 1`),
/// which stays deterministic even when earlier items were dropped.
pub fn parse_quick_reference(payload: &Value, course_title: &str) -> QuickReferenceGuide {
    let mut steps: Vec<QuickRefStep> = Vec::new();

    for item in raw_items(payload, "steps") {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let step_number = field_opt_u32(obj, "step_number")
            .filter(|n| *n >= 1)
            .unwrap_or(steps.len() as u32 + 1);
        steps.push(QuickRefStep {
            step_number,
            title: field_str(obj, "title", "Step"),
            action: field_str(obj, "action", ""),
            notes: field_opt_str(obj, "notes"),
        });
    }

    let title = payload
        .as_object()
        .map(|obj| field_str(obj, "course_title", course_title))
        .unwrap_or_else(|| course_title.to_string());

    QuickReferenceGuide {
        course_title: title,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_outline_happy_path() {
        let payload = json!({
            "title": "Widgets 101",
            "sections": [
                {
                    "title": "Basics",
                    "objectives": ["Know widgets"],
                    "duration_minutes": 15,
                    "subtopics": ["History"]
                }
            ]
        });

        let outline = parse_outline(&payload, "Intro to Widgets", "Full Class");
        assert_eq!(outline.title, "Widgets 101");
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(outline.sections[0].duration_minutes, Some(15));
    }

    #[test]
    fn test_parse_outline_title_fallback() {
        let outline = parse_outline(&json!({}), "Intro to Widgets", "Full Class");
        assert_eq!(outline.title, "Intro to Widgets (Full Class)");
        assert!(outline.sections.is_empty());
    }

    #[test]
    fn test_parsers_total_on_garbage() {
        // Non-object payloads still produce valid artifacts.
        for payload in [json!(null), json!("text"), json!(42), json!([1, 2])] {
            let outline = parse_outline(&payload, "T", "C");
            assert_eq!(outline.title, "T (C)");
            let guide = parse_instructor_guide(&payload, "C");
            assert!(guide.sections.is_empty());
            let script = parse_video_script(&payload, "T");
            assert_eq!(script.course_title, "T");
            let qrg = parse_quick_reference(&payload, "T");
            assert!(qrg.steps.is_empty());
        }
    }

    #[test]
    fn test_partial_drop_isolation() {
        // The malformed middle item is dropped; neighbors are untouched and
        // keep their relative order.
        let payload = json!({
            "segments": [
                {"title": "One", "narration": "first"},
                "not an object",
                {"title": "Three", "narration": "third"}
            ]
        });

        let script = parse_video_script(&payload, "T");
        assert_eq!(script.segments.len(), 2);
        assert_eq!(script.segments[0].title, "One");
        assert_eq!(script.segments[0].narration, "first");
        assert_eq!(script.segments[1].title, "Three");
    }

    #[test]
    fn test_wrong_typed_fields_get_defaults() {
        let payload = json!({
            "sections": [
                {"title": 7, "objectives": "not a list", "duration_minutes": "abc"}
            ]
        });

        let outline = parse_outline(&payload, "T", "C");
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(outline.sections[0].title, "Untitled Section");
        assert!(outline.sections[0].objectives.is_empty());
        assert_eq!(outline.sections[0].duration_minutes, None);
    }

    #[test]
    fn test_step_numbering_determinism() {
        // Raw numbers [2, missing, "abc"] resolve to [2, 2, 3] under the
        // position-fallback rule.
        let payload = json!({
            "steps": [
                {"step_number": 2, "title": "A", "action": "do"},
                {"title": "B", "action": "do"},
                {"step_number": "abc", "title": "C", "action": "do"}
            ]
        });

        let qrg = parse_quick_reference(&payload, "T");
        let numbers: Vec<u32> = qrg.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![2, 2, 3]);
    }

    #[test]
    fn test_step_number_numeric_string_passes_through() {
        let payload = json!({"steps": [{"step_number": "7", "title": "A", "action": "x"}]});
        let qrg = parse_quick_reference(&payload, "T");
        assert_eq!(qrg.steps[0].step_number, 7);
    }

    #[test]
    fn test_instructor_guide_class_type_fallback() {
        let guide = parse_instructor_guide(&json!({}), "Short Video");
        assert_eq!(guide.class_type, "Short Video");

        let guide =
            parse_instructor_guide(&json!({"class_type": "Workshop"}), "Short Video");
        assert_eq!(guide.class_type, "Workshop");
    }

    #[test]
    fn test_instructor_guide_front_matter_and_checklists() {
        let payload = json!({
            "training_plan_and_goals": "Teach widgets",
            "before_class_checklist": ["Print handouts"],
            "handouts": ["Cheat sheet"],
            "sections": [
                {
                    "title": "Kickoff",
                    "instructional_steps": ["Welcome everyone"],
                    "key_points": ["Widgets matter"],
                    "estimated_time_minutes": 5
                }
            ]
        });

        let guide = parse_instructor_guide(&payload, "Full Class");
        assert_eq!(guide.training_plan_and_goals, "Teach widgets");
        assert_eq!(guide.before_class_checklist, vec!["Print handouts"]);
        assert_eq!(guide.sections[0].estimated_time_minutes, Some(5));
    }
}
