//! Package generation orchestrator.
//!
//! Runs the prompt/parse/fallback state machine once per artifact kind and
//! aggregates the four results. A kind that fails generation degrades to its
//! fallback template; the overall package always completes. Parsers are
//! total functions, so the fallback path is only ever taken on generation
//! failure, but the per-kind isolation means a future parser panic could
//! never take down more than its own kind either.

use crate::artifact::{
    ArtifactKind, ClassOutline, GeneratedPackage, InstructorGuide, QuickReferenceGuide, VideoScript,
};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::generation::client::{format_source_excerpt, OpenAiGenerator, StructuredGenerator};
use crate::generation::fallback::{
    fallback_instructor_guide, fallback_outline, fallback_quick_reference, fallback_video_script,
};
use crate::generation::parsers::{
    parse_instructor_guide, parse_outline, parse_quick_reference, parse_video_script,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of one package generation: the complete package plus the kinds
/// that degraded to fallback content.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub package: GeneratedPackage,
    pub degraded: Vec<ArtifactKind>,
}

impl PackageOutcome {
    /// Whether any artifact fell back to template content.
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Facade that generates the four training artifacts for one request.
///
/// Construct one per request; a per-request API key override applies to the
/// generator instance only and cannot leak into other requests.
pub struct PackageGenerator {
    generator: Arc<dyn StructuredGenerator>,
    prompts: Prompts,
    excerpt_limit: usize,
}

impl PackageGenerator {
    /// Create a generator from settings, with an optional per-request API key.
    pub fn new(settings: &Settings, api_key: Option<&str>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self::with_generator(
            Arc::new(OpenAiGenerator::new(&settings.generation, api_key)),
            prompts,
            settings.generation.excerpt_limit,
        ))
    }

    /// Create a generator with a custom backend (used by tests).
    pub fn with_generator(
        generator: Arc<dyn StructuredGenerator>,
        prompts: Prompts,
        excerpt_limit: usize,
    ) -> Self {
        Self {
            generator,
            prompts,
            excerpt_limit,
        }
    }

    /// Build the complete four-artifact package.
    ///
    /// The four kinds have no data dependency on one another and run
    /// concurrently. The package is only complete once all four are done.
    #[instrument(skip(self, source_text), fields(course_title = %course_title))]
    pub async fn build_package(
        &self,
        source_text: &str,
        course_title: &str,
        class_type: &str,
    ) -> PackageOutcome {
        info!("Generating training package");

        let (outline, guide, script, qrg) = futures::join!(
            self.generate_outline(source_text, course_title, class_type),
            self.generate_instructor_guide(source_text, course_title, class_type),
            self.generate_video_script(source_text, course_title, class_type),
            self.generate_quick_reference(source_text, course_title, class_type),
        );

        let mut degraded = Vec::new();
        for (kind, fell_back) in [
            (ArtifactKind::Outline, outline.1),
            (ArtifactKind::InstructorGuide, guide.1),
            (ArtifactKind::VideoScript, script.1),
            (ArtifactKind::QuickReference, qrg.1),
        ] {
            if fell_back {
                degraded.push(kind);
            }
        }

        PackageOutcome {
            package: GeneratedPackage {
                outline: outline.0,
                instructor_guide: guide.0,
                video_script: script.0,
                quick_reference: qrg.0,
            },
            degraded,
        }
    }

    /// Generate a class outline, falling back on failure.
    /// Returns the artifact and whether it is fallback content.
    pub async fn generate_outline(
        &self,
        source_text: &str,
        course_title: &str,
        class_type: &str,
    ) -> (ClassOutline, bool) {
        match self
            .request(ArtifactKind::Outline, source_text, course_title, class_type)
            .await
        {
            Ok(payload) => (parse_outline(&payload, course_title, class_type), false),
            Err(e) => {
                warn!("Class outline generation failed, using fallback: {}", e);
                (fallback_outline(course_title), true)
            }
        }
    }

    /// Generate an instructor guide, falling back on failure.
    pub async fn generate_instructor_guide(
        &self,
        source_text: &str,
        course_title: &str,
        class_type: &str,
    ) -> (InstructorGuide, bool) {
        match self
            .request(
                ArtifactKind::InstructorGuide,
                source_text,
                course_title,
                class_type,
            )
            .await
        {
            Ok(payload) => (parse_instructor_guide(&payload, class_type), false),
            Err(e) => {
                warn!("Instructor guide generation failed, using fallback: {}", e);
                (fallback_instructor_guide(course_title), true)
            }
        }
    }

    /// Generate a video script, falling back on failure.
    pub async fn generate_video_script(
        &self,
        source_text: &str,
        course_title: &str,
        class_type: &str,
    ) -> (VideoScript, bool) {
        match self
            .request(
                ArtifactKind::VideoScript,
                source_text,
                course_title,
                class_type,
            )
            .await
        {
            Ok(payload) => (parse_video_script(&payload, course_title), false),
            Err(e) => {
                warn!("Video script generation failed, using fallback: {}", e);
                (fallback_video_script(course_title), true)
            }
        }
    }

    /// Generate a quick reference guide, falling back on failure.
    pub async fn generate_quick_reference(
        &self,
        source_text: &str,
        course_title: &str,
        class_type: &str,
    ) -> (QuickReferenceGuide, bool) {
        match self
            .request(
                ArtifactKind::QuickReference,
                source_text,
                course_title,
                class_type,
            )
            .await
        {
            Ok(payload) => (parse_quick_reference(&payload, course_title), false),
            Err(e) => {
                warn!("Quick reference generation failed, using fallback: {}", e);
                (fallback_quick_reference(course_title), true)
            }
        }
    }

    /// Render the prompt pair for a kind and issue the generation request.
    async fn request(
        &self,
        kind: ArtifactKind,
        source_text: &str,
        course_title: &str,
        class_type: &str,
    ) -> Result<serde_json::Value> {
        let mut vars = HashMap::new();
        vars.insert("course_title".to_string(), course_title.to_string());
        vars.insert("class_type".to_string(), class_type.to_string());
        vars.insert(
            "source_excerpt".to_string(),
            format_source_excerpt(source_text, self.excerpt_limit),
        );

        let templates = self.prompts.artifact(kind);
        let system = self.prompts.render_with_custom(&templates.system, &vars);
        let user = self.prompts.render_with_custom(&templates.user, &vars);

        self.generator.generate_structured(&system, &user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaereError;
    use async_trait::async_trait;
    use serde_json::json;

    /// Stub generator with a canned reply per artifact kind, keyed on the
    /// schema hint present in each system prompt.
    struct StubGenerator {
        fail_all: bool,
    }

    #[async_trait]
    impl StructuredGenerator for StubGenerator {
        async fn generate_structured(
            &self,
            system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<serde_json::Value> {
            if self.fail_all {
                return Err(LaereError::OpenAI("stubbed outage".to_string()));
            }

            if system_prompt.contains("\"sections\"") && system_prompt.contains("\"subtopics\"") {
                Ok(json!({
                    "title": "Generated Outline",
                    "sections": [{"title": "S1", "objectives": ["o"], "subtopics": []}]
                }))
            } else if system_prompt.contains("instructional_steps") {
                Ok(json!({
                    "sections": [{"title": "G1", "instructional_steps": ["step"]}]
                }))
            } else if system_prompt.contains("screen_directions") {
                Ok(json!({
                    "segments": [{"title": "V1", "narration": "hi", "screen_directions": "cut"}]
                }))
            } else {
                Ok(json!({
                    "steps": [{"step_number": 1, "title": "Q1", "action": "do"}]
                }))
            }
        }
    }

    fn generator(fail_all: bool) -> PackageGenerator {
        PackageGenerator::with_generator(
            Arc::new(StubGenerator { fail_all }),
            Prompts::default_templates(),
            6000,
        )
    }

    #[tokio::test]
    async fn test_build_package_happy_path() {
        let outcome = generator(false)
            .build_package("Widgets are small mechanical parts...", "Intro to Widgets", "Full Class")
            .await;

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.package.outline.title, "Generated Outline");
        assert_eq!(outcome.package.outline.sections.len(), 1);
        assert_eq!(outcome.package.video_script.segments.len(), 1);
        assert_eq!(outcome.package.quick_reference.steps.len(), 1);
        assert_eq!(outcome.package.instructor_guide.sections.len(), 1);
    }

    #[tokio::test]
    async fn test_build_package_degrades_to_fallback_on_total_failure() {
        let outcome = generator(true)
            .build_package("text", "Intro to Widgets", "Full Class")
            .await;

        assert_eq!(outcome.degraded.len(), 4);
        // The returned outline equals the fallback template for that title.
        assert_eq!(
            outcome.package.outline,
            fallback_outline("Intro to Widgets")
        );
        assert!(!outcome.package.video_script.segments.is_empty());
        assert!(!outcome.package.quick_reference.steps.is_empty());
    }

    #[tokio::test]
    async fn test_outcome_always_complete() {
        // Regardless of which kinds fail, every field is populated.
        for fail_all in [false, true] {
            let outcome = generator(fail_all).build_package("t", "T", "C").await;
            assert!(!outcome.package.outline.sections.is_empty());
            assert!(!outcome.package.instructor_guide.sections.is_empty());
            assert!(!outcome.package.video_script.segments.is_empty());
            assert!(!outcome.package.quick_reference.steps.is_empty());
        }
    }
}
