//! Resolve phase - effective metadata per class.

use eyre::Result;

use crate::{
    metadata::resolve,
    pipeline::{CompilationContext, Phase},
};

/// Phase that merges the global conventions with each class's overrides.
///
/// A class whose settings conflict is failed and skipped by later phases.
pub struct ResolvePhase;

impl Phase for ResolvePhase {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn description(&self) -> &'static str {
        "Resolve effective metadata per class"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let ir = ctx.ir()?;
        let results: Vec<_> = ir
            .classes
            .iter()
            .map(|class| {
                (
                    class.name.clone(),
                    resolve(class, &ir.config, ir.overrides_for(&class.name)),
                )
            })
            .collect();

        for (name, result) in results {
            match result {
                Ok(meta) => {
                    tracing::debug!(
                        class = %name,
                        table = %meta.table_name,
                        route = %meta.route_base,
                        role = meta.capabilities.role.as_str(),
                        "resolved metadata"
                    );
                    ctx.metadata.insert(name, meta);
                }
                Err(err) => ctx.fail_class(self.name(), err),
            }
        }
        Ok(())
    }
}
