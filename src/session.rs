//! Request-scoped session state.
//!
//! Holds the artifacts produced by one generation run so later steps
//! (narration, export, video rendering) can operate on them without
//! regenerating. A new run replaces the previous state wholesale.

use crate::artifact::{ArtifactKind, GeneratedPackage};
use crate::generation::PackageOutcome;
use std::collections::HashMap;

/// State carried across the steps of one working session.
#[derive(Debug, Default)]
pub struct SessionContext {
    /// The most recently generated package, if any.
    pub package: Option<GeneratedPackage>,
    /// Kinds that degraded to fallback content in the last run.
    pub degraded: Vec<ArtifactKind>,
    /// Narration audio keyed by filename.
    pub narration: HashMap<String, Vec<u8>>,
    /// Id of an in-flight or completed render job.
    pub render_job: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session contents with a fresh generation outcome.
    ///
    /// Narration and render state belong to the previous package and are
    /// cleared along with it.
    pub fn store_outcome(&mut self, outcome: PackageOutcome) {
        self.package = Some(outcome.package);
        self.degraded = outcome.degraded;
        self.narration.clear();
        self.render_job = None;
    }

    /// Whether a package has been generated in this session.
    pub fn has_package(&self) -> bool {
        self.package.is_some()
    }

    /// Clear all session state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> PackageOutcome {
        PackageOutcome {
            package: GeneratedPackage::default(),
            degraded: vec![ArtifactKind::VideoScript],
        }
    }

    #[test]
    fn test_store_outcome_replaces_previous_state() {
        let mut session = SessionContext::new();
        session.narration.insert("old.mp3".to_string(), vec![1]);
        session.render_job = Some("job-1".to_string());

        session.store_outcome(outcome());

        assert!(session.has_package());
        assert_eq!(session.degraded, vec![ArtifactKind::VideoScript]);
        assert!(session.narration.is_empty());
        assert!(session.render_job.is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionContext::new();
        session.store_outcome(outcome());
        session.reset();

        assert!(!session.has_package());
        assert!(session.degraded.is_empty());
    }
}
