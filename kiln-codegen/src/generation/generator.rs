//! Renders planned classes through a stack adapter.

use eyre::Result;
use kiln_core::{ArtifactKind, GeneratedArtifact, Overwrite};

use super::FileRegistry;
use crate::{ConfigurationError, pipeline::CompilationContext, stack::StackAdapter};

/// An artifact that was not generated because its class failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArtifact {
    pub class_name: String,
    pub kind: ArtifactKind,
    pub reason: ConfigurationError,
}

/// Result of one generation run.
///
/// Every class of the model contributes exactly four entries: either four
/// artifacts, or four skipped records carrying the same reason.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub stack: &'static str,
    pub artifacts: Vec<GeneratedArtifact>,
    pub skipped: Vec<SkippedArtifact>,
}

impl GenerationOutcome {
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub fn artifact(&self, class_name: &str, kind: ArtifactKind) -> Option<&GeneratedArtifact> {
        self.artifacts
            .iter()
            .find(|a| a.class_name == class_name && a.kind == kind)
    }

    pub fn artifact_at(&self, relative_path: &str) -> Option<&GeneratedArtifact> {
        self.artifacts
            .iter()
            .find(|a| a.relative_path == relative_path)
    }

    /// Names of the classes that were skipped, in model order.
    pub fn skipped_classes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for skipped in &self.skipped {
            if !names.contains(&skipped.class_name.as_str()) {
                names.push(&skipped.class_name);
            }
        }
        names
    }

    /// A registry holding every artifact.
    pub fn into_registry(self, overwrite: Overwrite) -> FileRegistry {
        let mut registry = FileRegistry::new(overwrite);
        registry.register_all(self.artifacts);
        registry
    }
}

/// Render every class of a pipeline run with `adapter`.
///
/// Classes are visited in declaration order. A failed class yields skipped
/// records instead of artifacts.
pub fn generate(ctx: &CompilationContext, adapter: &dyn StackAdapter) -> Result<GenerationOutcome> {
    let ir = ctx.ir()?;
    let mut outcome = GenerationOutcome {
        stack: adapter.name(),
        ..GenerationOutcome::default()
    };

    let _span = tracing::debug_span!("generate", stack = adapter.name()).entered();

    for class in &ir.classes {
        if let Some(plan) = ctx.plans.get(&class.name) {
            for kind in ArtifactKind::ALL {
                let path = adapter.artifact_path(&ir.meta, &class.name, kind);
                let content = adapter.render(kind, &ir.meta, plan);
                outcome
                    .artifacts
                    .push(GeneratedArtifact::new(&class.name, kind, path, content));
            }
            tracing::info!(class = %class.name, "generated {} artifacts", ArtifactKind::ALL.len());
        } else if let Some(reason) = ctx.failed.get(&class.name) {
            tracing::warn!(class = %class.name, "skipped: {}", reason);
            outcome
                .skipped
                .extend(ArtifactKind::ALL.into_iter().map(|kind| SkippedArtifact {
                    class_name: class.name.clone(),
                    kind,
                    reason: reason.clone(),
                }));
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use kiln_ir::{Attribute, Cardinality, ClassModel, DomainIR, ProjectMeta, SemanticType};

    use super::*;
    use crate::{pipeline::Pipeline, testing::PlainAdapter};

    #[test]
    fn test_four_artifacts_per_class() {
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .class(ClassModel::new("Order").attribute(Attribute::new("total", SemanticType::Double)))
            .class(ClassModel::new("Tag").attribute(Attribute::new("label", SemanticType::String)));
        let ctx = Pipeline::new().run_ir(ir).unwrap();
        let outcome = generate(&ctx, &PlainAdapter).unwrap();

        assert_eq!(outcome.stack, "plain");
        assert_eq!(outcome.artifacts.len(), 8);
        assert!(!outcome.is_partial());
        let entity = outcome.artifact("Order", ArtifactKind::Entity).unwrap();
        assert_eq!(entity.relative_path, "out/entity/Order.txt");
        assert!(outcome.artifact_at("out/controller/TagController.txt").is_some());
    }

    #[test]
    fn test_failed_class_yields_skipped_records() {
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .class(ClassModel::new("Order").relationship("Ghost", Cardinality::ManyToOne))
            .class(ClassModel::new("Tag").attribute(Attribute::new("label", SemanticType::String)));
        let ctx = Pipeline::new().run_ir(ir).unwrap();
        let outcome = generate(&ctx, &PlainAdapter).unwrap();

        assert_eq!(outcome.artifacts.len(), 4);
        assert_eq!(outcome.skipped.len(), 4);
        assert_eq!(outcome.skipped_classes(), ["Order"]);
        assert!(
            outcome
                .skipped
                .iter()
                .all(|s| s.reason.code() == "dangling-relationship")
        );
        let kinds: Vec<_> = outcome.skipped.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ArtifactKind::ALL);
    }

    #[test]
    fn test_outcome_into_registry() {
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .class(ClassModel::new("Tag").attribute(Attribute::new("label", SemanticType::String)));
        let ctx = Pipeline::new().run_ir(ir).unwrap();
        let registry = generate(&ctx, &PlainAdapter)
            .unwrap()
            .into_registry(Overwrite::Always);

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.preview()[0].kind, ArtifactKind::Entity);
    }
}
