//! Pipeline orchestrator.

use eyre::Result;
use kiln_ir::DomainIR;
use kiln_manifest::Manifest;

use super::{
    CompilationContext, Phase, PhaseInfo, Plugin,
    phases::{LowerPhase, PlanPhase, RelatePhase, ResolvePhase, ValidatePhase},
};

/// The generation pipeline orchestrator.
///
/// Runs the built-in phases (lower, validate, resolve, relate, plan) followed
/// by any user phases, calling plugin hooks before and after each phase.
///
/// # Example
///
/// ```
/// use kiln_codegen::pipeline::{CompilationContext, Pipeline, Plugin};
/// use kiln_ir::{Attribute, ClassModel, DomainIR, ProjectMeta, SemanticType};
///
/// struct PlannedClasses;
///
/// impl Plugin for PlannedClasses {
///     fn name(&self) -> &'static str {
///         "planned-classes"
///     }
///
///     fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> eyre::Result<()> {
///         if phase == "plan" {
///             tracing::info!(classes = ctx.plans.len(), "planned");
///         }
///         Ok(())
///     }
/// }
///
/// let ir = DomainIR::new(ProjectMeta::new("shop"))
///     .class(ClassModel::new("Tag").attribute(Attribute::new("label", SemanticType::String)));
/// let ctx = Pipeline::new().plugin(PlannedClasses).run_ir(ir)?;
/// assert!(ctx.plans.contains_key("Tag"));
/// # Ok::<(), eyre::Report>(())
/// ```
pub struct Pipeline {
    validate: ValidatePhase,
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create a pipeline with the built-in phases and default lints.
    pub fn new() -> Self {
        Self {
            validate: ValidatePhase::new(),
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run the pipeline on a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally. Classes with
    /// configuration errors are skipped, not fatal.
    pub fn run(&self, manifest: Manifest) -> Result<CompilationContext> {
        self.execute(CompilationContext::new(manifest))
    }

    /// Run the pipeline on a domain IR built in code.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally.
    pub fn run_ir(&self, ir: DomainIR) -> Result<CompilationContext> {
        self.execute(CompilationContext::from_ir(ir))
    }

    /// Name and description of every phase, in run order.
    pub fn phase_info(&self) -> Vec<PhaseInfo> {
        self.ordered().into_iter().map(|p| p.info()).collect()
    }

    fn ordered(&self) -> Vec<&dyn Phase> {
        let builtin: [&dyn Phase; 5] = [
            &LowerPhase,
            &self.validate,
            &ResolvePhase,
            &RelatePhase,
            &PlanPhase,
        ];
        builtin
            .into_iter()
            .chain(self.phases.iter().map(|p| p.as_ref()))
            .collect()
    }

    fn execute(&self, mut ctx: CompilationContext) -> Result<CompilationContext> {
        for phase in self.ordered() {
            self.run_phase(phase, &mut ctx)?;
        }

        Ok(ctx)
    }

    /// Run a single phase with plugin hooks.
    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();
        let _span = tracing::debug_span!("phase", name = phase_name).entered();

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;
        tracing::debug!(
            diagnostics = ctx.diagnostics.len(),
            failed = ctx.failed.len(),
            "phase finished"
        );

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
