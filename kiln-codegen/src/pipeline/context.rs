//! Compilation context passed through pipeline phases.

use eyre::{Result, eyre};
use indexmap::IndexMap;
use kiln_ir::{DomainIR, EffectiveMetadata};
use kiln_manifest::Manifest;

use super::diagnostic::{Diagnostic, Severity};
use crate::{ConfigurationError, generators::ClassPlan, relations::RelationGraph};

/// State carried through every pipeline phase.
#[derive(Debug)]
pub struct CompilationContext {
    /// The manifest being compiled, when the run started from one.
    pub manifest: Option<Manifest>,
    /// Domain IR (populated by LowerPhase, or given up front).
    pub ir: Option<DomainIR>,
    /// Effective metadata of every class that resolved (populated by ResolvePhase).
    pub metadata: IndexMap<String, EffectiveMetadata>,
    /// Relation ends between live classes (populated by RelatePhase).
    pub relations: Option<RelationGraph>,
    /// Artifact plans per class, in declaration order (populated by PlanPhase).
    pub plans: IndexMap<String, ClassPlan>,
    /// Classes skipped because of a configuration error.
    pub failed: IndexMap<String, ConfigurationError>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest: Some(manifest),
            ..Self::empty()
        }
    }

    /// Start from an already built domain IR, skipping lowering.
    pub fn from_ir(ir: DomainIR) -> Self {
        Self {
            ir: Some(ir),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            manifest: None,
            ir: None,
            metadata: IndexMap::new(),
            relations: None,
            plans: IndexMap::new(),
            failed: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The domain IR.
    ///
    /// # Errors
    ///
    /// Returns an error if no IR is available yet.
    pub fn ir(&self) -> Result<&DomainIR> {
        self.ir
            .as_ref()
            .ok_or_else(|| eyre!("domain IR not set - did LowerPhase run?"))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }

    /// Record a configuration error and skip the class from here on.
    ///
    /// Only the first error of a class is kept.
    pub fn fail_class(&mut self, phase: &str, error: ConfigurationError) {
        let class = error.class().to_string();
        if self.failed.contains_key(&class) {
            return;
        }
        tracing::warn!(class = %class, code = error.code(), "skipping class: {}", error);
        self.diagnostics.push(
            Diagnostic::error(phase, error.to_string())
                .for_class(&class)
                .with_code(error.code())
                .at(format!("classes.{}", class)),
        );
        self.metadata.shift_remove(&class);
        self.plans.shift_remove(&class);
        self.failed.insert(class, error);
    }

    pub fn is_failed(&self, class: &str) -> bool {
        self.failed.contains_key(class)
    }
}
