//! One step of the generation pipeline.

use eyre::Result;

use super::CompilationContext;

/// Name and one-line summary, as listed by `kiln explain`.
#[derive(Debug, Clone)]
pub struct PhaseInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A step that reads the [`CompilationContext`] and fills in its next layer.
///
/// The built-in order is lower, validate, resolve, relate, plan. Each phase
/// may rely on everything the earlier ones produced.
pub trait Phase: Send + Sync {
    /// Passed to plugin hooks and stamped on diagnostics.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// # Errors
    ///
    /// Only for model-wide failures. A problem confined to one class goes
    /// through [`CompilationContext::fail_class`] instead.
    fn run(&self, ctx: &mut CompilationContext) -> Result<()>;

    fn info(&self) -> PhaseInfo {
        PhaseInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
