//! Hooks around pipeline phases.

use eyre::Result;

use super::CompilationContext;

/// Observer wrapped around every phase of a [`Pipeline`](super::Pipeline).
///
/// Hooks get the context mutably, so a plugin may add diagnostics or mark a
/// class failed before the next phase sees it. Any error aborts the run.
///
/// ```ignore
/// struct PlannedClasses;
///
/// impl Plugin for PlannedClasses {
///     fn name(&self) -> &'static str { "planned-classes" }
///
///     fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
///         if phase == "plan" {
///             tracing::info!(classes = ctx.plans.len(), "planned");
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    #[allow(unused_variables)]
    fn on_before_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }
}
