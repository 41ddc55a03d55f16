//! Relate phase - relation ends between live classes.

use eyre::Result;

use crate::{
    ConfigurationError,
    pipeline::{CompilationContext, Phase},
    relations::{RelationGraph, dangling_targets},
};

/// Phase that fails classes with dangling relationships and derives the
/// relation ends of the remaining ones.
///
/// A class pointing at a failed class fails as well, so failures propagate
/// until every live class only points at live classes.
pub struct RelatePhase;

impl Phase for RelatePhase {
    fn name(&self) -> &'static str {
        "relate"
    }

    fn description(&self) -> &'static str {
        "Derive relation ends between generated classes"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        link(ctx, self.name())
    }
}

/// Fail dangling classes, then rebuild the relation graph.
pub(super) fn link(ctx: &mut CompilationContext, phase: &str) -> Result<()> {
    let ir = ctx.ir()?;
    let mut live: Vec<&str> = ir
        .classes
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| ctx.metadata.contains_key(*name))
        .collect();

    let mut failures = Vec::new();
    loop {
        let dangling = ir.classes.iter().find_map(|class| {
            if !live.contains(&class.name.as_str()) {
                return None;
            }
            dangling_targets(class, &live)
                .first()
                .map(|target| (class.name.as_str(), *target))
        });
        let Some((class, target)) = dangling else {
            break;
        };
        live.retain(|name| *name != class);
        let (class, target) = (class.to_string(), target.to_string());
        failures.push(if ir.find_class(&target).is_some() {
            ConfigurationError::DependsOnFailedClass { class, target }
        } else {
            ConfigurationError::DanglingRelationship { class, target }
        });
    }

    for failure in failures {
        ctx.fail_class(phase, failure);
    }

    let ir = ctx.ir()?;
    let graph = RelationGraph::build(&ir.classes, &ctx.metadata);
    tracing::debug!(ends = graph.len(), "built relation graph");
    ctx.relations = Some(graph);
    Ok(())
}
