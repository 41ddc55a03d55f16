//! Plan phase - artifact specs for every live class.

use eyre::{Result, eyre};
use indexmap::IndexMap;

use super::relate::link;
use crate::{
    ConfigurationError,
    generators::{ClassPlan, plan_controller, plan_entity, plan_repository, plan_service},
    pipeline::{CompilationContext, Diagnostic, Phase},
};

/// Phase that plans the entity, repository, service and controller of each
/// live class.
///
/// Entities are planned first. A class whose fields collide is failed and the
/// relation graph rebuilt, so no other class keeps a relation to it.
pub struct PlanPhase;

impl Phase for PlanPhase {
    fn name(&self) -> &'static str {
        "plan"
    }

    fn description(&self) -> &'static str {
        "Plan the artifacts of every class"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        loop {
            let collisions = entity_failures(ctx)?;
            if collisions.is_empty() {
                break;
            }
            for err in collisions {
                ctx.fail_class(self.name(), err);
            }
            link(ctx, self.name())?;
        }

        let ir = ctx.ir()?;
        let graph = ctx
            .relations
            .as_ref()
            .ok_or_else(|| eyre!("relation graph not set - did RelatePhase run?"))?;

        let mut plans = IndexMap::new();
        let mut diagnostics = Vec::new();
        for class in &ir.classes {
            let Some(meta) = ctx.metadata.get(&class.name) else {
                continue;
            };
            let ends = graph.ends_for(&class.name);

            let entity = plan_entity(class, meta, ends, &mut diagnostics)?;
            let repository = plan_repository(class, meta, ends, &mut diagnostics);
            let service = plan_service(class, meta, ends, &repository.op_names());
            let controller = plan_controller(class, meta, &service.signatures());

            for (op, missing) in &service.missing_repository_ops {
                diagnostics.push(
                    Diagnostic::error(
                        self.name(),
                        format!(
                            "service operation '{}' calls repository operation '{}' which was not generated",
                            op, missing
                        ),
                    )
                    .with_code("missing-repository-op")
                    .for_class(&class.name),
                );
            }
            for missing in &controller.missing_service_ops {
                diagnostics.push(
                    Diagnostic::error(
                        self.name(),
                        format!(
                            "route for '{}' has no matching service operation",
                            missing
                        ),
                    )
                    .with_code("missing-service-op")
                    .for_class(&class.name),
                );
            }

            tracing::debug!(
                class = %class.name,
                fields = entity.fields.len(),
                repository_ops = repository.ops.len(),
                service_ops = service.ops.len(),
                routes = controller.routes.len(),
                "planned class"
            );
            plans.insert(
                class.name.clone(),
                ClassPlan {
                    class: class.clone(),
                    metadata: meta.clone(),
                    entity,
                    repository,
                    service,
                    controller,
                },
            );
        }

        ctx.diagnostics.extend(diagnostics);
        ctx.plans = plans;
        Ok(())
    }
}

/// Field collisions among the live classes.
fn entity_failures(ctx: &CompilationContext) -> Result<Vec<ConfigurationError>> {
    let ir = ctx.ir()?;
    let Some(graph) = &ctx.relations else {
        return Ok(Vec::new());
    };
    Ok(ir
        .classes
        .iter()
        .filter_map(|class| {
            let meta = ctx.metadata.get(&class.name)?;
            plan_entity(class, meta, graph.ends_for(&class.name), &mut Vec::new()).err()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use kiln_ir::{
        Attribute, Cardinality, ClassModel, DomainIR, GlobalConfig, ProjectMeta, SemanticType,
    };

    use super::*;
    use crate::pipeline::Pipeline;

    #[test]
    fn test_plan_every_class() {
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .class(ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String)))
            .class(ClassModel::new("Tag").attribute(Attribute::new("name", SemanticType::String)));
        let ctx = Pipeline::new().run_ir(ir).unwrap();

        let names: Vec<_> = ctx.plans.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Order", "Tag"]);
        let order = &ctx.plans["Order"];
        assert!(order.service.has_op("updateStatus"));
        assert_eq!(order.state_enum(), Some("OrderStatus"));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_collision_fails_class_and_dependents() {
        let config = GlobalConfig {
            audit_fields: true,
            ..GlobalConfig::default()
        };
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .with_config(config)
            .class(
                ClassModel::new("Invoice")
                    .attribute(Attribute::new("createdAt", SemanticType::Date)),
            )
            .class(ClassModel::new("Payment").relationship("Invoice", Cardinality::ManyToOne))
            .class(ClassModel::new("Customer").attribute(Attribute::new("email", SemanticType::String)));
        let ctx = Pipeline::new().run_ir(ir).unwrap();

        assert_eq!(ctx.failed["Invoice"].code(), "field-collision");
        assert_eq!(
            ctx.failed["Payment"],
            ConfigurationError::DependsOnFailedClass {
                class: "Payment".into(),
                target: "Invoice".into(),
            }
        );
        let names: Vec<_> = ctx.plans.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Customer"]);
    }

    #[test]
    fn test_unsupported_type_is_a_warning() {
        let ir = DomainIR::new(ProjectMeta::new("shop")).class(
            ClassModel::new("Product")
                .attribute(Attribute::new("price", kiln_ir::AttributeType::parse("Money"))),
        );
        let ctx = Pipeline::new().run_ir(ir).unwrap();

        assert!(ctx.plans.contains_key("Product"));
        let warning = ctx.warnings().next().unwrap();
        assert_eq!(warning.code.as_deref(), Some("unsupported-type"));
    }
}
